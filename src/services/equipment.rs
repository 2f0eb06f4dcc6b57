//! Equipment service

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{
            CreateEquipment, Equipment, EquipmentFilter, EquipmentWithUrgency, RegisteredEquipment,
        },
        maintenance::MaintenanceScheduleEntry,
        LocationKind, Urgency,
    },
    repository::{EquipmentDirectory, MaintenanceStore},
    scheduling::{self, UrgencyPolicy},
};

#[derive(Clone)]
pub struct EquipmentService {
    directory: Arc<dyn EquipmentDirectory>,
    store: Arc<dyn MaintenanceStore>,
    policy: UrgencyPolicy,
}

impl EquipmentService {
    pub fn new(
        directory: Arc<dyn EquipmentDirectory>,
        store: Arc<dyn MaintenanceStore>,
        policy: UrgencyPolicy,
    ) -> Self {
        Self {
            directory,
            store,
            policy,
        }
    }

    /// List equipment with the overall urgency derived from active schedules
    pub async fn list_with_urgency(
        &self,
        filter: &EquipmentFilter,
        today: NaiveDate,
    ) -> AppResult<Vec<EquipmentWithUrgency>> {
        if filter.area_id.is_some_and(|id| id <= 0) || filter.workstation_id.is_some_and(|id| id <= 0) {
            return Err(AppError::Validation("Location ids must be positive".to_string()));
        }
        let equipment = self.directory.list_equipment(filter).await?;

        let active_ids: Vec<i32> = equipment
            .iter()
            .filter(|e| e.is_active())
            .map(|e| e.id)
            .collect();

        let mut by_equipment: HashMap<i32, Vec<MaintenanceScheduleEntry>> = HashMap::new();
        if !active_ids.is_empty() {
            for schedule in self.store.list_active_schedules_for(&active_ids).await? {
                by_equipment
                    .entry(schedule.equipment_id)
                    .or_default()
                    .push(schedule);
            }
        }

        Ok(equipment
            .into_iter()
            .map(|equipment| {
                let schedules = by_equipment
                    .get(&equipment.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let maintenance_urgency = if equipment.is_active() {
                    scheduling::aggregate(schedules, today, &self.policy)
                } else {
                    Urgency::Unknown
                };
                EquipmentWithUrgency {
                    equipment,
                    maintenance_urgency,
                }
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<Equipment> {
        self.directory
            .get_equipment(id)
            .await?
            .ok_or(AppError::EquipmentNotFound(id))
    }

    /// Register equipment, optionally with its first maintenance schedules
    pub async fn register(&self, data: &CreateEquipment) -> AppResult<RegisteredEquipment> {
        match data.location_kind {
            LocationKind::Area if data.area_id.is_none() => {
                return Err(AppError::Validation(
                    "area_id is required for area equipment".to_string(),
                ))
            }
            LocationKind::Workstation if data.workstation_id.is_none() => {
                return Err(AppError::Validation(
                    "workstation_id is required for workstation equipment".to_string(),
                ))
            }
            _ => {}
        }

        let drafts = data
            .schedules
            .iter()
            .map(|s| s.to_spec().and_then(scheduling::draft_schedule))
            .collect::<AppResult<Vec<_>>>()?;

        let (equipment, schedules) = self.directory.register_equipment(data, &drafts).await?;
        tracing::info!(
            "Registered equipment {} ({}) with {} schedules",
            equipment.id,
            equipment.name,
            schedules.len()
        );

        Ok(RegisteredEquipment {
            equipment,
            schedules,
        })
    }
}
