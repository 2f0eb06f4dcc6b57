//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    enums::{EquipmentStatus, LocationKind, Urgency},
    maintenance::{AttachSchedule, MaintenanceScheduleEntry},
};

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    /// Equipment name
    pub name: String,
    /// Internal inventory code
    pub internal_code: Option<String>,
    pub description: Option<String>,
    /// Whether the equipment sits directly in an area or at a workstation
    pub location_kind: LocationKind,
    pub area_id: Option<i32>,
    pub workstation_id: Option<i32>,
    /// Person in charge of the equipment
    pub responsible_name: Option<String>,
    pub responsible_document: Option<String>,
    pub status: EquipmentStatus,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl Equipment {
    pub fn is_active(&self) -> bool {
        self.status == EquipmentStatus::Active
    }
}

/// Equipment with its derived overall maintenance urgency
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentWithUrgency {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub maintenance_urgency: Urgency,
}

/// Register equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 50, message = "Internal code must be at most 50 characters"))]
    pub internal_code: Option<String>,
    pub description: Option<String>,
    pub location_kind: LocationKind,
    pub area_id: Option<i32>,
    pub workstation_id: Option<i32>,
    pub responsible_name: Option<String>,
    pub responsible_document: Option<String>,
    /// Maintenance cadences attached at registration
    #[serde(default)]
    #[validate(nested)]
    pub schedules: Vec<AttachSchedule>,
}

/// Newly registered equipment with the schedules created alongside it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisteredEquipment {
    pub equipment: Equipment,
    pub schedules: Vec<MaintenanceScheduleEntry>,
}

/// Query parameters for equipment listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    /// Filter by status (active, inactive)
    pub status: Option<EquipmentStatus>,
    /// Only equipment located in this area (including its workstations)
    pub area_id: Option<i32>,
    /// Only equipment installed at this workstation
    pub workstation_id: Option<i32>,
    /// Reference date for urgency (YYYY-MM-DD, defaults to today)
    pub today: Option<String>,
}

impl EquipmentQuery {
    pub fn filter(&self) -> EquipmentFilter {
        EquipmentFilter {
            status: self.status,
            area_id: self.area_id,
            workstation_id: self.workstation_id,
        }
    }
}

/// Typed filter for the equipment listing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EquipmentFilter {
    pub status: Option<EquipmentStatus>,
    pub area_id: Option<i32>,
    pub workstation_id: Option<i32>,
}
