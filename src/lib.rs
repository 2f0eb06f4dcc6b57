//! Assetlog maintenance server
//!
//! Tracks industrial equipment and its preventive maintenance cadences,
//! logs performed maintenance and derives per-equipment urgency, exposed
//! as a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Kept for the readiness probe
    pub repository: repository::Repository,
}
