//! Maintenance scheduling engine
//!
//! Pure date arithmetic and urgency derivation. Nothing in here touches the
//! database or reads the system clock: every classification receives the
//! reference date ("today") from its caller.

pub mod aggregate;
pub mod engine;

pub use aggregate::aggregate;
pub use engine::{
    advance_schedule, classify_urgency, compute_due_date, days_remaining, draft_schedule,
    reschedule, UrgencyPolicy, DEFAULT_UPCOMING_THRESHOLD_DAYS,
};
