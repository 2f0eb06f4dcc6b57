//! Business logic services

pub mod decommission;
pub mod equipment;
pub mod maintenance;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::{
    config::MaintenanceConfig,
    repository::{DecommissionStore, EquipmentDirectory, MaintenanceStore, Repository},
    scheduling::UrgencyPolicy,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub decommission: decommission::DecommissionService,
}

impl Services {
    /// Create all services over the PostgreSQL repository
    pub fn new(repository: Repository, maintenance_config: &MaintenanceConfig) -> Self {
        let directory: Arc<dyn EquipmentDirectory> = Arc::new(repository.equipment.clone());
        let store: Arc<dyn MaintenanceStore> = Arc::new(repository.maintenance.clone());
        let decommissions: Arc<dyn DecommissionStore> = Arc::new(repository.decommissions.clone());
        let policy = UrgencyPolicy::new(maintenance_config.upcoming_threshold_days);

        Self {
            equipment: equipment::EquipmentService::new(directory.clone(), store.clone(), policy),
            maintenance: maintenance::MaintenanceService::new(directory.clone(), store, policy),
            decommission: decommission::DecommissionService::new(directory, decommissions),
        }
    }
}
