//! Repository layer for database operations
//!
//! Services depend on the store traits below rather than on PostgreSQL, so
//! each store handle is injected explicitly and can be mocked in tests.

pub mod decommissions;
pub mod equipment;
pub mod maintenance;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        decommission::{DecommissionFilter, DecommissionRecord, DecommissionedEquipment, NewDecommission},
        equipment::{CreateEquipment, Equipment, EquipmentFilter},
        maintenance::{
            MaintenanceEvent, MaintenanceScheduleEntry, NewMaintenanceEvent, ScheduleDraft,
            ScheduleWithEquipment,
        },
        MaintenanceKind,
    },
};

/// Read/write access to the equipment directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentDirectory: Send + Sync {
    /// Get equipment by ID, `None` if it does not exist
    async fn get_equipment(&self, id: i32) -> AppResult<Option<Equipment>>;

    /// List equipment matching every set field of `filter`
    async fn list_equipment(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>>;

    /// Insert equipment together with its initial schedules in one transaction
    async fn register_equipment(
        &self,
        data: &CreateEquipment,
        schedules: &[ScheduleDraft],
    ) -> AppResult<(Equipment, Vec<MaintenanceScheduleEntry>)>;
}

/// Storage for maintenance schedules and the maintenance log.
///
/// Writes re-check under a row lock that the equipment is still active.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    async fn insert_schedule(
        &self,
        equipment_id: i32,
        draft: &ScheduleDraft,
    ) -> AppResult<MaintenanceScheduleEntry>;

    async fn get_schedule(&self, id: i32) -> AppResult<Option<MaintenanceScheduleEntry>>;

    /// Schedules of one equipment, active only unless `include_inactive`
    async fn list_schedules(
        &self,
        equipment_id: i32,
        include_inactive: bool,
    ) -> AppResult<Vec<MaintenanceScheduleEntry>>;

    /// Active schedules of the given equipment
    async fn list_active_schedules_for(
        &self,
        equipment_ids: &[i32],
    ) -> AppResult<Vec<MaintenanceScheduleEntry>>;

    /// Active schedules belonging to active equipment
    async fn list_schedulable(&self) -> AppResult<Vec<ScheduleWithEquipment>>;

    /// Persist interval/anchor/due/label of `schedule` if its version is
    /// still current; bumps the version
    async fn update_schedule(
        &self,
        schedule: &MaintenanceScheduleEntry,
    ) -> AppResult<MaintenanceScheduleEntry>;

    async fn set_schedule_active(
        &self,
        id: i32,
        active: bool,
    ) -> AppResult<Option<MaintenanceScheduleEntry>>;

    /// Hard-delete one schedule; `false` if it did not exist
    async fn delete_schedule(&self, id: i32) -> AppResult<bool>;

    /// Hard-delete every schedule of an equipment, returns the count
    async fn delete_schedules_for_equipment(&self, equipment_id: i32) -> AppResult<u64>;

    /// Insert a preventive event and advance its schedule atomically.
    /// `advanced` carries the version it was read with. Fails with
    /// `AlreadyInactive` if the equipment was decommissioned meanwhile.
    async fn record_performed(
        &self,
        event: &NewMaintenanceEvent,
        advanced: &MaintenanceScheduleEntry,
    ) -> AppResult<(MaintenanceEvent, MaintenanceScheduleEntry)>;

    /// Insert an event that does not touch any schedule
    async fn insert_event(&self, event: &NewMaintenanceEvent) -> AppResult<MaintenanceEvent>;

    /// Event history of an equipment, most recent first
    async fn list_events(
        &self,
        equipment_id: i32,
        kind: Option<MaintenanceKind>,
    ) -> AppResult<Vec<MaintenanceEvent>>;
}

/// Storage for decommission audit records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DecommissionStore: Send + Sync {
    /// Flip the equipment to inactive and write the record in one transaction
    async fn decommission(&self, record: &NewDecommission) -> AppResult<DecommissionRecord>;

    async fn get_decommission(&self, equipment_id: i32) -> AppResult<Option<DecommissionRecord>>;

    async fn list_decommissioned(
        &self,
        filter: &DecommissionFilter,
    ) -> AppResult<Vec<DecommissionedEquipment>>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub equipment: equipment::EquipmentRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub decommissions: decommissions::DecommissionsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            decommissions: decommissions::DecommissionsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
