//! Maintenance models (schedules, events, derived status)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    enums::{EquipmentStatus, MaintenanceKind, MaintenanceType, Urgency},
    parse_optional_date,
};
use crate::error::AppResult;

// ---------------------------------------------------------------------------
// MaintenanceScheduleEntry
// ---------------------------------------------------------------------------

/// A maintenance cadence attached to one equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceScheduleEntry {
    pub id: i32,
    pub equipment_id: i32,
    pub maintenance_type: MaintenanceType,
    /// Days between two maintenances (always positive)
    pub interval_days: i32,
    /// Date the interval is counted from (last performed or initial setup)
    pub anchor_date: Option<NaiveDate>,
    /// anchor_date + interval_days, absent while no anchor is known
    pub due_date: Option<NaiveDate>,
    /// Inactive schedules are kept for history only
    pub active: bool,
    /// Optional display name
    pub label: Option<String>,
    /// Optimistic concurrency counter
    pub version: i32,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Validated schedule ready to be persisted (due date already computed)
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDraft {
    pub maintenance_type: MaintenanceType,
    pub interval_days: i32,
    pub anchor_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub label: Option<String>,
}

/// Attach schedule request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AttachSchedule {
    pub maintenance_type: MaintenanceType,
    /// Interval in days (must be positive)
    pub interval_days: i32,
    /// Start date of the cadence (YYYY-MM-DD)
    pub anchor_date: Option<String>,
    #[validate(length(max = 120, message = "Label must be at most 120 characters"))]
    pub label: Option<String>,
}

/// Typed schedule settings, dates already parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSpec {
    pub maintenance_type: MaintenanceType,
    pub interval_days: i32,
    pub anchor_date: Option<NaiveDate>,
    pub label: Option<String>,
}

impl AttachSchedule {
    pub fn to_spec(&self) -> AppResult<ScheduleSpec> {
        Ok(ScheduleSpec {
            maintenance_type: self.maintenance_type,
            interval_days: self.interval_days,
            anchor_date: parse_optional_date("anchor_date", self.anchor_date.as_deref())?,
            label: self.label.clone(),
        })
    }
}

/// Update schedule request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSchedule {
    pub interval_days: Option<i32>,
    /// New anchor date (YYYY-MM-DD)
    pub anchor_date: Option<String>,
    #[validate(length(max = 120, message = "Label must be at most 120 characters"))]
    pub label: Option<String>,
}

/// Typed schedule changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleChanges {
    pub interval_days: Option<i32>,
    pub anchor_date: Option<NaiveDate>,
    pub label: Option<String>,
}

impl UpdateSchedule {
    pub fn to_changes(&self) -> AppResult<ScheduleChanges> {
        Ok(ScheduleChanges {
            interval_days: self.interval_days,
            anchor_date: parse_optional_date("anchor_date", self.anchor_date.as_deref())?,
            label: self.label.clone(),
        })
    }
}

/// Query parameters for schedule listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ScheduleQuery {
    /// Include deactivated schedules
    pub include_inactive: Option<bool>,
}

// ---------------------------------------------------------------------------
// MaintenanceEvent
// ---------------------------------------------------------------------------

/// A performed maintenance (preventive or corrective)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceEvent {
    pub id: i32,
    pub equipment_id: i32,
    /// Schedule advanced by this event (always null for corrective work)
    pub schedule_id: Option<i32>,
    pub kind: MaintenanceKind,
    pub performed_date: NaiveDate,
    pub performed_by: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Who did what, and when
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub performed_date: NaiveDate,
    pub performed_by: String,
    pub description: Option<String>,
    pub notes: Option<String>,
}

/// Event about to be inserted.
///
/// Only built through [`NewMaintenanceEvent::preventive`] and
/// [`NewMaintenanceEvent::corrective`], so a corrective event can never
/// reference a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceEvent {
    equipment_id: i32,
    schedule_id: Option<i32>,
    kind: MaintenanceKind,
    details: EventDetails,
}

impl NewMaintenanceEvent {
    pub fn preventive(schedule: &MaintenanceScheduleEntry, details: EventDetails) -> Self {
        Self {
            equipment_id: schedule.equipment_id,
            schedule_id: Some(schedule.id),
            kind: MaintenanceKind::Preventive,
            details,
        }
    }

    pub fn corrective(equipment_id: i32, details: EventDetails) -> Self {
        Self {
            equipment_id,
            schedule_id: None,
            kind: MaintenanceKind::Corrective,
            details,
        }
    }

    pub fn equipment_id(&self) -> i32 {
        self.equipment_id
    }

    pub fn schedule_id(&self) -> Option<i32> {
        self.schedule_id
    }

    pub fn kind(&self) -> MaintenanceKind {
        self.kind
    }

    pub fn details(&self) -> &EventDetails {
        &self.details
    }
}

/// Record preventive maintenance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPreventive {
    pub schedule_id: i32,
    /// Date the work was done (YYYY-MM-DD, defaults to today)
    pub performed_date: Option<String>,
    /// Technician name (defaults to the authenticated user)
    #[validate(length(min = 1, max = 120, message = "performed_by must be 1-120 characters"))]
    pub performed_by: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

/// Record corrective maintenance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordCorrective {
    pub equipment_id: i32,
    /// Date the work was done (YYYY-MM-DD, defaults to today)
    pub performed_date: Option<String>,
    #[validate(length(min = 1, max = 120, message = "performed_by must be 1-120 characters"))]
    pub performed_by: Option<String>,
    #[validate(length(min = 1, message = "A description of the repair is required"))]
    pub description: String,
    pub notes: Option<String>,
}

/// Preventive event together with the schedule it advanced
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PreventiveRecorded {
    pub event: MaintenanceEvent,
    pub schedule: MaintenanceScheduleEntry,
}

/// Query parameters for event history
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    /// Filter by kind (preventive, corrective)
    pub kind: Option<MaintenanceKind>,
}

// ---------------------------------------------------------------------------
// Derived status
// ---------------------------------------------------------------------------

/// A schedule classified against a reference date
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduleStatus {
    #[serde(flatten)]
    pub schedule: MaintenanceScheduleEntry,
    pub urgency: Urgency,
    /// Whole days until the due date (negative when overdue)
    pub days_remaining: Option<i64>,
}

/// Overall maintenance state of one equipment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentMaintenanceStatus {
    pub equipment_id: i32,
    pub equipment_status: EquipmentStatus,
    pub as_of: NaiveDate,
    pub urgency: Urgency,
    pub schedules: Vec<ScheduleStatus>,
}

/// Active schedule of an active equipment, as read for due listings
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleWithEquipment {
    #[sqlx(flatten)]
    pub schedule: MaintenanceScheduleEntry,
    pub equipment_name: String,
}

/// One entry of the upcoming/overdue listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DueMaintenance {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub schedule: ScheduleStatus,
}

/// Query parameters for the due listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DueQuery {
    /// Restrict to UPCOMING or OVERDUE
    pub urgency: Option<Urgency>,
    /// Reference date (YYYY-MM-DD, defaults to today)
    pub today: Option<String>,
}

/// Query parameters carrying only a reference date
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TodayQuery {
    /// Reference date (YYYY-MM-DD, defaults to today)
    pub today: Option<String>,
}
