//! Due-date arithmetic and per-schedule urgency

use chrono::{Days, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{MaintenanceScheduleEntry, ScheduleChanges, ScheduleDraft, ScheduleSpec},
        Urgency,
    },
};

/// Schedules due within this many days are `UPCOMING`
pub const DEFAULT_UPCOMING_THRESHOLD_DAYS: i64 = 10;

/// Thresholds used to turn a due date into an [`Urgency`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyPolicy {
    pub upcoming_threshold_days: i64,
}

impl Default for UrgencyPolicy {
    fn default() -> Self {
        Self {
            upcoming_threshold_days: DEFAULT_UPCOMING_THRESHOLD_DAYS,
        }
    }
}

impl UrgencyPolicy {
    pub fn new(upcoming_threshold_days: i64) -> Self {
        Self {
            upcoming_threshold_days,
        }
    }

    /// Classify a due date against `today`
    pub fn classify(&self, due_date: Option<NaiveDate>, today: NaiveDate) -> Urgency {
        let Some(due) = due_date else {
            return Urgency::Unknown;
        };

        let remaining = days_remaining(due, today);
        if remaining <= 0 {
            Urgency::Overdue
        } else if remaining <= self.upcoming_threshold_days {
            Urgency::Upcoming
        } else {
            Urgency::Ok
        }
    }
}

/// Add `interval_days` calendar days to `anchor_date`
pub fn compute_due_date(anchor_date: NaiveDate, interval_days: i32) -> AppResult<NaiveDate> {
    if interval_days <= 0 {
        return Err(AppError::InvalidInterval(interval_days));
    }
    anchor_date
        .checked_add_days(Days::new(interval_days as u64))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Due date out of range: {} + {} days",
                anchor_date, interval_days
            ))
        })
}

/// Whole calendar days from `today` until `due_date`, negative once past.
///
/// Both ends are day-granular, so the ceiling of the fractional day count is
/// the plain difference.
pub fn days_remaining(due_date: NaiveDate, today: NaiveDate) -> i64 {
    due_date.signed_duration_since(today).num_days()
}

/// Classify with the default 10-day threshold
pub fn classify_urgency(due_date: Option<NaiveDate>, today: NaiveDate) -> Urgency {
    UrgencyPolicy::default().classify(due_date, today)
}

/// Validate new schedule settings and compute the initial due date
pub fn draft_schedule(spec: ScheduleSpec) -> AppResult<ScheduleDraft> {
    let due_date = due_date_for(spec.anchor_date, spec.interval_days)?;
    Ok(ScheduleDraft {
        maintenance_type: spec.maintenance_type,
        interval_days: spec.interval_days,
        anchor_date: spec.anchor_date,
        due_date,
        label: spec.label,
    })
}

/// Move a schedule's anchor to `performed_date` and recompute its due date.
///
/// The returned entry keeps the version it was read with; the store uses it
/// to detect concurrent advances.
pub fn advance_schedule(
    schedule: &MaintenanceScheduleEntry,
    performed_date: NaiveDate,
) -> AppResult<MaintenanceScheduleEntry> {
    if !schedule.active {
        return Err(AppError::ScheduleNotFound(schedule.id));
    }
    let due_date = compute_due_date(performed_date, schedule.interval_days)?;
    Ok(MaintenanceScheduleEntry {
        anchor_date: Some(performed_date),
        due_date: Some(due_date),
        ..schedule.clone()
    })
}

/// Apply interval/anchor/label changes, keeping the due date in step
pub fn reschedule(
    schedule: &MaintenanceScheduleEntry,
    changes: &ScheduleChanges,
) -> AppResult<MaintenanceScheduleEntry> {
    if !schedule.active {
        return Err(AppError::ScheduleNotFound(schedule.id));
    }
    let interval_days = changes.interval_days.unwrap_or(schedule.interval_days);
    let anchor_date = changes.anchor_date.or(schedule.anchor_date);
    let due_date = due_date_for(anchor_date, interval_days)?;

    Ok(MaintenanceScheduleEntry {
        interval_days,
        anchor_date,
        due_date,
        label: changes.label.clone().or_else(|| schedule.label.clone()),
        ..schedule.clone()
    })
}

fn due_date_for(anchor_date: Option<NaiveDate>, interval_days: i32) -> AppResult<Option<NaiveDate>> {
    if interval_days <= 0 {
        return Err(AppError::InvalidInterval(interval_days));
    }
    anchor_date
        .map(|anchor| compute_due_date(anchor, interval_days))
        .transpose()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::MaintenanceType;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn schedule(id: i32, interval_days: i32, anchor: Option<NaiveDate>) -> MaintenanceScheduleEntry {
        MaintenanceScheduleEntry {
            id,
            equipment_id: 1,
            maintenance_type: MaintenanceType::Inspection,
            interval_days,
            anchor_date: anchor,
            due_date: anchor.map(|a| compute_due_date(a, interval_days).unwrap()),
            active: true,
            label: None,
            version: 1,
            crea_date: None,
            modif_date: None,
        }
    }

    #[test]
    fn test_due_date_adds_exact_days() {
        let anchors = [date(2024, 1, 1), date(2024, 2, 28), date(2023, 12, 31), date(2024, 3, 9)];
        for anchor in anchors {
            for interval in [1, 7, 28, 29, 30, 31, 90, 365, 366, 1000] {
                let due = compute_due_date(anchor, interval).unwrap();
                assert_eq!((due - anchor).num_days(), interval as i64);
            }
        }
    }

    #[test]
    fn test_due_date_crosses_leap_day_and_dst() {
        assert_eq!(compute_due_date(date(2024, 2, 28), 1).unwrap(), date(2024, 2, 29));
        // US/EU daylight-saving switch weekends have no effect on civil dates
        assert_eq!(compute_due_date(date(2024, 3, 9), 2).unwrap(), date(2024, 3, 11));
        assert_eq!(compute_due_date(date(2024, 10, 26), 1).unwrap(), date(2024, 10, 27));
    }

    #[test]
    fn test_non_positive_interval_rejected() {
        assert!(matches!(
            compute_due_date(date(2024, 1, 1), 0),
            Err(AppError::InvalidInterval(0))
        ));
        assert!(matches!(
            compute_due_date(date(2024, 1, 1), -3),
            Err(AppError::InvalidInterval(-3))
        ));
    }

    #[test]
    fn test_classify_boundaries() {
        let today = date(2024, 6, 1);
        assert_eq!(classify_urgency(Some(today), today), Urgency::Overdue);
        assert_eq!(classify_urgency(Some(date(2024, 5, 20)), today), Urgency::Overdue);
        assert_eq!(classify_urgency(Some(date(2024, 6, 2)), today), Urgency::Upcoming);
        assert_eq!(classify_urgency(Some(date(2024, 6, 11)), today), Urgency::Upcoming);
        assert_eq!(classify_urgency(Some(date(2024, 6, 12)), today), Urgency::Ok);
        assert_eq!(classify_urgency(None, today), Urgency::Unknown);
    }

    #[test]
    fn test_custom_threshold() {
        let policy = UrgencyPolicy::new(3);
        let today = date(2024, 6, 1);
        assert_eq!(policy.classify(Some(date(2024, 6, 4)), today), Urgency::Upcoming);
        assert_eq!(policy.classify(Some(date(2024, 6, 5)), today), Urgency::Ok);
    }

    #[test]
    fn test_thirty_day_scenario() {
        let due = compute_due_date(date(2024, 1, 1), 30).unwrap();
        assert_eq!(due, date(2024, 1, 31));

        assert_eq!(days_remaining(due, date(2024, 1, 25)), 6);
        assert_eq!(classify_urgency(Some(due), date(2024, 1, 25)), Urgency::Upcoming);

        assert_eq!(days_remaining(due, date(2024, 2, 5)), -5);
        assert_eq!(classify_urgency(Some(due), date(2024, 2, 5)), Urgency::Overdue);
    }

    #[test]
    fn test_advance_moves_anchor_and_due() {
        let entry = schedule(5, 30, Some(date(2024, 1, 1)));
        let advanced = advance_schedule(&entry, date(2024, 1, 28)).unwrap();
        assert_eq!(advanced.anchor_date, Some(date(2024, 1, 28)));
        assert_eq!(advanced.due_date, Some(date(2024, 2, 27)));
        assert_eq!(advanced.version, entry.version);
    }

    #[test]
    fn test_advance_same_date_twice_is_stable() {
        let entry = schedule(5, 30, Some(date(2024, 1, 1)));
        let once = advance_schedule(&entry, date(2024, 2, 1)).unwrap();
        let twice = advance_schedule(&once, date(2024, 2, 1)).unwrap();
        assert_eq!(once.due_date, twice.due_date);
        assert_eq!(twice.due_date, Some(date(2024, 3, 2)));
    }

    #[test]
    fn test_advance_inactive_schedule_rejected() {
        let mut entry = schedule(9, 30, Some(date(2024, 1, 1)));
        entry.active = false;
        assert!(matches!(
            advance_schedule(&entry, date(2024, 2, 1)),
            Err(AppError::ScheduleNotFound(9))
        ));
    }

    #[test]
    fn test_advance_sets_anchor_when_missing() {
        let entry = schedule(2, 14, None);
        let advanced = advance_schedule(&entry, date(2024, 5, 1)).unwrap();
        assert_eq!(advanced.due_date, Some(date(2024, 5, 15)));
    }

    #[test]
    fn test_draft_without_anchor_has_no_due_date() {
        let draft = draft_schedule(ScheduleSpec {
            maintenance_type: MaintenanceType::Cleaning,
            interval_days: 15,
            anchor_date: None,
            label: None,
        })
        .unwrap();
        assert_eq!(draft.due_date, None);

        let invalid = draft_schedule(ScheduleSpec {
            maintenance_type: MaintenanceType::Cleaning,
            interval_days: 0,
            anchor_date: None,
            label: None,
        });
        assert!(matches!(invalid, Err(AppError::InvalidInterval(0))));
    }

    #[test]
    fn test_reschedule_recomputes_due_date() {
        let entry = schedule(3, 30, Some(date(2024, 1, 1)));

        let longer = reschedule(
            &entry,
            &ScheduleChanges {
                interval_days: Some(60),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(longer.due_date, Some(date(2024, 3, 1)));

        let moved = reschedule(
            &entry,
            &ScheduleChanges {
                anchor_date: Some(date(2024, 4, 1)),
                label: Some("Filter check".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(moved.due_date, Some(date(2024, 5, 1)));
        assert_eq!(moved.label.as_deref(), Some("Filter check"));

        assert!(matches!(
            reschedule(
                &entry,
                &ScheduleChanges {
                    interval_days: Some(-1),
                    ..Default::default()
                }
            ),
            Err(AppError::InvalidInterval(-1))
        ));
    }
}
