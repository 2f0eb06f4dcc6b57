//! Data models for Assetlog

pub mod decommission;
pub mod enums;
pub mod equipment;
pub mod maintenance;
pub mod user;

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use decommission::{DecommissionRecord, DecommissionedEquipment};
pub use enums::{EquipmentStatus, LocationKind, MaintenanceKind, MaintenanceType, Urgency};
pub use equipment::Equipment;
pub use maintenance::{MaintenanceEvent, MaintenanceScheduleEntry};

/// Parse a `YYYY-MM-DD` date coming from a request
pub fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field)))
}

/// Parse an optional `YYYY-MM-DD` date; blank strings count as absent
pub fn parse_optional_date(field: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}
