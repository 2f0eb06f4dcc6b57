//! Equipment decommissioning service

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::decommission::{
        DecommissionFilter, DecommissionRecord, DecommissionedEquipment, NewDecommission,
    },
    repository::{DecommissionStore, EquipmentDirectory},
};

#[derive(Clone)]
pub struct DecommissionService {
    directory: Arc<dyn EquipmentDirectory>,
    decommissions: Arc<dyn DecommissionStore>,
}

impl DecommissionService {
    pub fn new(directory: Arc<dyn EquipmentDirectory>, decommissions: Arc<dyn DecommissionStore>) -> Self {
        Self {
            directory,
            decommissions,
        }
    }

    /// Take equipment out of service and write its audit record.
    ///
    /// The status check is repeated under a row lock by the store; the check
    /// here only gives an early answer for the common case.
    pub async fn decommission(
        &self,
        equipment_id: i32,
        reason: &str,
        notes: Option<String>,
        decommissioned_by: &str,
        decommissioned_date: NaiveDate,
    ) -> AppResult<DecommissionRecord> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A decommission reason is required".to_string()));
        }

        let equipment = self
            .directory
            .get_equipment(equipment_id)
            .await?
            .ok_or(AppError::EquipmentNotFound(equipment_id))?;
        if !equipment.is_active() {
            return Err(AppError::AlreadyInactive(equipment_id));
        }

        let record = self
            .decommissions
            .decommission(&NewDecommission {
                equipment_id,
                reason: reason.to_string(),
                notes,
                decommissioned_date,
                decommissioned_by: decommissioned_by.to_string(),
            })
            .await?;

        tracing::info!(
            "Equipment {} decommissioned by {} on {}: {}",
            equipment_id,
            record.decommissioned_by,
            record.decommissioned_date,
            record.reason
        );
        Ok(record)
    }

    /// Decommission record of one equipment
    pub async fn get_record(&self, equipment_id: i32) -> AppResult<DecommissionRecord> {
        self.decommissions
            .get_decommission(equipment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No decommission record for equipment {}", equipment_id))
            })
    }

    /// Inactive equipment with their records, newest first
    pub async fn list_decommissioned(
        &self,
        filter: &DecommissionFilter,
    ) -> AppResult<Vec<DecommissionedEquipment>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(AppError::Validation(format!(
                    "from ({}) must not be after to ({})",
                    from, to
                )));
            }
        }
        self.decommissions.list_decommissioned(filter).await
    }
}
