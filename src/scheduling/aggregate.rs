//! Worst-case-wins reduction of several schedules to one urgency

use chrono::NaiveDate;

use super::engine::UrgencyPolicy;
use crate::models::{maintenance::MaintenanceScheduleEntry, Urgency};

/// Overall urgency of an equipment from its schedules.
///
/// Inactive schedules are ignored. `OVERDUE` beats `UPCOMING` beats `OK`;
/// `UNKNOWN` only wins when nothing else is known (or there is nothing).
pub fn aggregate(
    schedules: &[MaintenanceScheduleEntry],
    today: NaiveDate,
    policy: &UrgencyPolicy,
) -> Urgency {
    schedules
        .iter()
        .filter(|s| s.active)
        .map(|s| policy.classify(s.due_date, today))
        .max_by_key(|u| u.severity())
        .unwrap_or(Urgency::Unknown)
}
