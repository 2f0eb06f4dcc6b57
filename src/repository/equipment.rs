//! Equipment repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, Transaction};

use super::{maintenance::insert_schedule_in, EquipmentDirectory};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentFilter},
        maintenance::{MaintenanceScheduleEntry, ScheduleDraft},
        EquipmentStatus, LocationKind,
    },
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Check that equipment is active and hold a share lock on its row until the
/// transaction ends. Conflicts with the `FOR UPDATE` taken by decommission,
/// so maintenance writes and decommissioning of one equipment serialize.
pub(crate) async fn lock_active_equipment(
    tx: &mut Transaction<'_, Postgres>,
    equipment_id: i32,
) -> AppResult<()> {
    let status: Option<EquipmentStatus> =
        sqlx::query_scalar("SELECT status FROM equipment WHERE id = $1 FOR SHARE")
            .bind(equipment_id)
            .fetch_optional(&mut **tx)
            .await?;

    match status {
        None => Err(AppError::EquipmentNotFound(equipment_id)),
        Some(EquipmentStatus::Inactive) => Err(AppError::AlreadyInactive(equipment_id)),
        Some(EquipmentStatus::Active) => Ok(()),
    }
}

#[async_trait]
impl EquipmentDirectory for EquipmentRepository {
    async fn get_equipment(&self, id: i32) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_equipment(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if filter.area_id.is_some() {
            conditions.push(format!("area_id = ${}", idx));
            idx += 1;
        }
        if filter.workstation_id.is_some() {
            conditions.push(format!("workstation_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!("SELECT * FROM equipment {} ORDER BY id", where_clause);

        let mut builder = sqlx::query_as::<_, Equipment>(&query);
        if let Some(status) = filter.status {
            builder = builder.bind(status);
        }
        if let Some(area_id) = filter.area_id {
            builder = builder.bind(area_id);
        }
        if let Some(workstation_id) = filter.workstation_id {
            builder = builder.bind(workstation_id);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    async fn register_equipment(
        &self,
        data: &CreateEquipment,
        schedules: &[ScheduleDraft],
    ) -> AppResult<(Equipment, Vec<MaintenanceScheduleEntry>)> {
        let mut tx = self.pool.begin().await?;

        // Workstation equipment inherits the workstation's area and, when not
        // given, its responsible person
        let (area_id, responsible_name, responsible_document) = match data.location_kind {
            LocationKind::Workstation => {
                let workstation_id = data.workstation_id.ok_or_else(|| {
                    AppError::Validation("workstation_id is required for workstation equipment".to_string())
                })?;
                let row = sqlx::query(
                    "SELECT area_id, responsible_name, responsible_document FROM workstations WHERE id = $1",
                )
                .bind(workstation_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Workstation {} not found", workstation_id)))?;

                (
                    Some(row.get::<i32, _>("area_id")),
                    data.responsible_name
                        .clone()
                        .or_else(|| row.get::<Option<String>, _>("responsible_name")),
                    data.responsible_document
                        .clone()
                        .or_else(|| row.get::<Option<String>, _>("responsible_document")),
                )
            }
            LocationKind::Area => {
                let area_id = data.area_id.ok_or_else(|| {
                    AppError::Validation("area_id is required for area equipment".to_string())
                })?;
                let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM areas WHERE id = $1)")
                    .bind(area_id)
                    .fetch_one(&mut *tx)
                    .await?;
                if !exists {
                    return Err(AppError::NotFound(format!("Area {} not found", area_id)));
                }
                (
                    Some(area_id),
                    data.responsible_name.clone(),
                    data.responsible_document.clone(),
                )
            }
        };

        let workstation_id = match data.location_kind {
            LocationKind::Workstation => data.workstation_id,
            LocationKind::Area => None,
        };

        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                name, internal_code, description, location_kind, area_id, workstation_id,
                responsible_name, responsible_document, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.internal_code)
        .bind(&data.description)
        .bind(data.location_kind)
        .bind(area_id)
        .bind(workstation_id)
        .bind(&responsible_name)
        .bind(&responsible_document)
        .bind(EquipmentStatus::Active)
        .fetch_one(&mut *tx)
        .await?;

        let mut entries = Vec::with_capacity(schedules.len());
        for draft in schedules {
            entries.push(insert_schedule_in(&mut tx, equipment.id, draft).await?);
        }

        tx.commit().await?;
        Ok((equipment, entries))
    }
}
