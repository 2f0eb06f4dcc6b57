//! Maintenance scheduling service
//!
//! Wires the pure scheduling engine to the stores: validation and date
//! arithmetic happen here, persistence (and its atomicity) in the store.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::Equipment,
        maintenance::{
            DueMaintenance, EquipmentMaintenanceStatus, EventDetails, MaintenanceEvent,
            MaintenanceScheduleEntry, NewMaintenanceEvent, PreventiveRecorded, ScheduleChanges,
            ScheduleSpec, ScheduleStatus,
        },
        MaintenanceKind, Urgency,
    },
    repository::{EquipmentDirectory, MaintenanceStore},
    scheduling::{self, UrgencyPolicy},
};

#[derive(Clone)]
pub struct MaintenanceService {
    directory: Arc<dyn EquipmentDirectory>,
    store: Arc<dyn MaintenanceStore>,
    policy: UrgencyPolicy,
}

impl MaintenanceService {
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

    async fn require_equipment(&self, id: i32) -> AppResult<Equipment> {
        self.directory
            .get_equipment(id)
            .await?
            .ok_or(AppError::EquipmentNotFound(id))
    }

    async fn require_active_equipment(&self, id: i32) -> AppResult<Equipment> {
        let equipment = self.require_equipment(id).await?;
        if !equipment.is_active() {
            return Err(AppError::AlreadyInactive(id));
        }
        Ok(equipment)
    }

    async fn require_active_schedule(&self, id: i32) -> AppResult<MaintenanceScheduleEntry> {
        self.store
            .get_schedule(id)
            .await?
            .filter(|s| s.active)
            .ok_or(AppError::ScheduleNotFound(id))
    }

    fn schedule_status(&self, schedule: MaintenanceScheduleEntry, today: NaiveDate) -> ScheduleStatus {
        let urgency = if schedule.active {
            self.policy.classify(schedule.due_date, today)
        } else {
            Urgency::Unknown
        };
        let days_remaining = schedule
            .due_date
            .map(|due| scheduling::days_remaining(due, today));
        ScheduleStatus {
            schedule,
            urgency,
            days_remaining,
        }
    }

    // ---- Schedules ----

    /// Attach a new maintenance cadence to an active equipment
    pub async fn attach_schedule(
        &self,
        equipment_id: i32,
        spec: ScheduleSpec,
    ) -> AppResult<MaintenanceScheduleEntry> {
        let draft = scheduling::draft_schedule(spec)?;
        self.require_active_equipment(equipment_id).await?;

        let entry = self.store.insert_schedule(equipment_id, &draft).await?;
        tracing::info!(
            "Attached {} schedule {} to equipment {} (every {} days, due {:?})",
            entry.maintenance_type,
            entry.id,
            equipment_id,
            entry.interval_days,
            entry.due_date
        );
        Ok(entry)
    }

    /// List the schedules of an equipment
    pub async fn list_schedules(
        &self,
        equipment_id: i32,
        include_inactive: bool,
    ) -> AppResult<Vec<MaintenanceScheduleEntry>> {
        self.require_equipment(equipment_id).await?;
        self.store.list_schedules(equipment_id, include_inactive).await
    }

    /// Change interval, anchor or label; the due date follows
    pub async fn update_schedule(
        &self,
        id: i32,
        changes: &ScheduleChanges,
    ) -> AppResult<MaintenanceScheduleEntry> {
        let current = self.require_active_schedule(id).await?;
        let updated = scheduling::reschedule(&current, changes)?;
        let saved = self.store.update_schedule(&updated).await?;
        tracing::info!("Updated schedule {} (due {:?})", id, saved.due_date);
        Ok(saved)
    }

    /// Logically delete a schedule, keeping it for history
    pub async fn deactivate_schedule(&self, id: i32) -> AppResult<MaintenanceScheduleEntry> {
        let entry = self
            .store
            .set_schedule_active(id, false)
            .await?
            .ok_or(AppError::ScheduleNotFound(id))?;
        tracing::info!("Deactivated schedule {}", id);
        Ok(entry)
    }

    /// Hard-delete one schedule
    pub async fn detach_one(&self, id: i32) -> AppResult<()> {
        if !self.store.delete_schedule(id).await? {
            return Err(AppError::ScheduleNotFound(id));
        }
        tracing::info!("Detached schedule {}", id);
        Ok(())
    }

    /// Hard-delete every schedule of an equipment. The event log is kept.
    pub async fn detach_all(&self, equipment_id: i32) -> AppResult<u64> {
        self.require_equipment(equipment_id).await?;
        let removed = self.store.delete_schedules_for_equipment(equipment_id).await?;
        tracing::info!("Detached {} schedules from equipment {}", removed, equipment_id);
        Ok(removed)
    }

    // ---- Maintenance log ----

    /// Log preventive work against a schedule and advance the schedule
    pub async fn record_preventive(
        &self,
        schedule_id: i32,
        details: EventDetails,
    ) -> AppResult<PreventiveRecorded> {
        let schedule = self.require_active_schedule(schedule_id).await?;
        self.require_active_equipment(schedule.equipment_id).await?;

        let advanced = scheduling::advance_schedule(&schedule, details.performed_date)?;
        let new_event = NewMaintenanceEvent::preventive(&schedule, details);

        let (event, schedule) = match self.store.record_performed(&new_event, &advanced).await {
            Ok(recorded) => recorded,
            Err(e) => {
                tracing::warn!("Preventive maintenance on schedule {} not recorded: {}", schedule_id, e);
                return Err(e);
            }
        };

        tracing::info!(
            "Preventive maintenance {} recorded on equipment {}, schedule {} now due {:?}",
            event.id,
            event.equipment_id,
            schedule.id,
            schedule.due_date
        );
        Ok(PreventiveRecorded { event, schedule })
    }

    /// Log corrective work; schedules are left untouched
    pub async fn record_corrective(
        &self,
        equipment_id: i32,
        details: EventDetails,
    ) -> AppResult<MaintenanceEvent> {
        self.require_active_equipment(equipment_id).await?;
        let event = self
            .store
            .insert_event(&NewMaintenanceEvent::corrective(equipment_id, details))
            .await?;
        tracing::info!("Corrective maintenance {} recorded on equipment {}", event.id, equipment_id);
        Ok(event)
    }

    /// Event history of an equipment, most recent first
    pub async fn list_events(
        &self,
        equipment_id: i32,
        kind: Option<MaintenanceKind>,
    ) -> AppResult<Vec<MaintenanceEvent>> {
        self.require_equipment(equipment_id).await?;
        self.store.list_events(equipment_id, kind).await
    }

    // ---- Derived state ----

    /// Per-schedule and overall urgency of one equipment.
    /// Inactive equipment is out of scheduling and reports `UNKNOWN`.
    pub async fn equipment_status(
        &self,
        equipment_id: i32,
        today: NaiveDate,
    ) -> AppResult<EquipmentMaintenanceStatus> {
        let equipment = self.require_equipment(equipment_id).await?;
        let schedules = self.store.list_schedules(equipment_id, false).await?;

        let (urgency, schedules) = if equipment.is_active() {
            let urgency = scheduling::aggregate(&schedules, today, &self.policy);
            let statuses = schedules
                .into_iter()
                .map(|s| self.schedule_status(s, today))
                .collect();
            (urgency, statuses)
        } else {
            let statuses = schedules
                .into_iter()
                .map(|schedule| ScheduleStatus {
                    schedule,
                    urgency: Urgency::Unknown,
                    days_remaining: None,
                })
                .collect();
            (Urgency::Unknown, statuses)
        };

        Ok(EquipmentMaintenanceStatus {
            equipment_id,
            equipment_status: equipment.status,
            as_of: today,
            urgency,
            schedules,
        })
    }

    /// Upcoming and overdue schedules of active equipment, most urgent first
    pub async fn due_maintenance(
        &self,
        today: NaiveDate,
        only: Option<Urgency>,
    ) -> AppResult<Vec<DueMaintenance>> {
        if let Some(filter) = only {
            if !filter.is_due() {
                return Err(AppError::Validation(format!(
                    "urgency filter must be UPCOMING or OVERDUE, got {}",
                    filter
                )));
            }
        }

        let mut due: Vec<DueMaintenance> = self
            .store
            .list_schedulable()
            .await?
            .into_iter()
            .map(|row| DueMaintenance {
                equipment_id: row.schedule.equipment_id,
                equipment_name: row.equipment_name,
                schedule: self.schedule_status(row.schedule, today),
            })
            .filter(|d| d.schedule.urgency.is_due())
            .filter(|d| only.map_or(true, |u| d.schedule.urgency == u))
            .collect();

        due.sort_by_key(|d| (d.schedule.days_remaining, d.schedule.schedule.id));
        Ok(due)
    }
}
