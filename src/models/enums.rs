//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// Maintenance urgency derived from a due date and the current date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Ok,
    Upcoming,
    Overdue,
    Unknown,
}

impl Urgency {
    /// Rank used for worst-case aggregation. `Unknown` ranks lowest so it
    /// never worsens a known state.
    pub fn severity(self) -> u8 {
        match self {
            Urgency::Unknown => 0,
            Urgency::Ok => 1,
            Urgency::Upcoming => 2,
            Urgency::Overdue => 3,
        }
    }

    /// Whether the state belongs in a "due" listing
    pub fn is_due(self) -> bool {
        matches!(self, Urgency::Upcoming | Urgency::Overdue)
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Urgency::Ok => "OK",
            Urgency::Upcoming => "UPCOMING",
            Urgency::Overdue => "OVERDUE",
            Urgency::Unknown => "UNKNOWN",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Equipment lifecycle status (stored as SMALLINT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum EquipmentStatus {
    Active = 0,
    Inactive = 1,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentStatus::Active => write!(f, "active"),
            EquipmentStatus::Inactive => write!(f, "inactive"),
        }
    }
}

// ---------------------------------------------------------------------------
// LocationKind
// ---------------------------------------------------------------------------

/// Where a piece of equipment is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum LocationKind {
    /// Directly in an area
    Area = 0,
    /// At a workstation inside an area
    Workstation = 1,
}

// ---------------------------------------------------------------------------
// MaintenanceType
// ---------------------------------------------------------------------------

/// Preventive maintenance sub-type carried by a schedule.
/// Corrective work is never scheduled and has no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum MaintenanceType {
    Inspection = 0,
    Cleaning = 1,
    Calibration = 2,
    Lubrication = 3,
    PartReplacement = 4,
    Other = 5,
}

impl std::fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MaintenanceType::Inspection => "Inspection",
            MaintenanceType::Cleaning => "Cleaning",
            MaintenanceType::Calibration => "Calibration",
            MaintenanceType::Lubrication => "Lubrication",
            MaintenanceType::PartReplacement => "Part replacement",
            MaintenanceType::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// MaintenanceKind
// ---------------------------------------------------------------------------

/// Kind of a logged maintenance event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum MaintenanceKind {
    Preventive = 0,
    Corrective = 1,
}
