//! Decommission models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::equipment::Equipment;

/// Audit record written when equipment is taken out of service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DecommissionRecord {
    pub id: i32,
    pub equipment_id: i32,
    pub reason: String,
    pub notes: Option<String>,
    pub decommissioned_date: NaiveDate,
    pub decommissioned_by: String,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Decommission request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DecommissionRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
    pub notes: Option<String>,
    /// Person responsible (defaults to the authenticated user)
    #[validate(length(min = 1, max = 120, message = "decommissioned_by must be 1-120 characters"))]
    pub decommissioned_by: Option<String>,
    /// Decommission date (YYYY-MM-DD, defaults to today)
    pub decommissioned_date: Option<String>,
}

/// Record about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewDecommission {
    pub equipment_id: i32,
    pub reason: String,
    pub notes: Option<String>,
    pub decommissioned_date: NaiveDate,
    pub decommissioned_by: String,
}

/// Inactive equipment joined with its decommission record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DecommissionedEquipment {
    pub equipment: Equipment,
    pub decommission: DecommissionRecord,
}

/// Query parameters for the decommission listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DecommissionQuery {
    /// Decommissioned on or after (YYYY-MM-DD)
    pub from: Option<String>,
    /// Decommissioned on or before (YYYY-MM-DD)
    pub to: Option<String>,
    /// Case-insensitive substring of the reason
    pub reason: Option<String>,
}

/// Typed filter for [`DecommissionQuery`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecommissionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub reason: Option<String>,
}
