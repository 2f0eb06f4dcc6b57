//! Maintenance schedules and maintenance log

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::{equipment::lock_active_equipment, MaintenanceStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{
            MaintenanceEvent, MaintenanceScheduleEntry, NewMaintenanceEvent, ScheduleDraft,
            ScheduleWithEquipment,
        },
        EquipmentStatus, MaintenanceKind,
    },
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Insert a schedule inside an open transaction
pub(crate) async fn insert_schedule_in(
    tx: &mut Transaction<'_, Postgres>,
    equipment_id: i32,
    draft: &ScheduleDraft,
) -> AppResult<MaintenanceScheduleEntry> {
    let row = sqlx::query_as::<_, MaintenanceScheduleEntry>(
        r#"
        INSERT INTO maintenance_schedules (
            equipment_id, maintenance_type, interval_days, anchor_date, due_date, active, label, version
        )
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, 1)
        RETURNING *
        "#,
    )
    .bind(equipment_id)
    .bind(draft.maintenance_type)
    .bind(draft.interval_days)
    .bind(draft.anchor_date)
    .bind(draft.due_date)
    .bind(&draft.label)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}

async fn insert_event_in(
    tx: &mut Transaction<'_, Postgres>,
    event: &NewMaintenanceEvent,
) -> AppResult<MaintenanceEvent> {
    let details = event.details();
    let row = sqlx::query_as::<_, MaintenanceEvent>(
        r#"
        INSERT INTO maintenance_events (
            equipment_id, schedule_id, kind, performed_date, performed_by, description, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(event.equipment_id())
    .bind(event.schedule_id())
    .bind(event.kind())
    .bind(details.performed_date)
    .bind(&details.performed_by)
    .bind(&details.description)
    .bind(&details.notes)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}

fn stale_schedule(id: i32) -> AppError {
    AppError::ConcurrentModification(format!(
        "Maintenance schedule {} was modified by another request, reload and retry",
        id
    ))
}

#[async_trait]
impl MaintenanceStore for MaintenanceRepository {
    async fn insert_schedule(
        &self,
        equipment_id: i32,
        draft: &ScheduleDraft,
    ) -> AppResult<MaintenanceScheduleEntry> {
        let mut tx = self.pool.begin().await?;
        lock_active_equipment(&mut tx, equipment_id).await?;
        let entry = insert_schedule_in(&mut tx, equipment_id, draft).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn get_schedule(&self, id: i32) -> AppResult<Option<MaintenanceScheduleEntry>> {
        let row = sqlx::query_as::<_, MaintenanceScheduleEntry>(
            "SELECT * FROM maintenance_schedules WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_schedules(
        &self,
        equipment_id: i32,
        include_inactive: bool,
    ) -> AppResult<Vec<MaintenanceScheduleEntry>> {
        let rows = sqlx::query_as::<_, MaintenanceScheduleEntry>(
            r#"
            SELECT * FROM maintenance_schedules
            WHERE equipment_id = $1 AND ($2 OR active)
            ORDER BY due_date NULLS LAST, id
            "#,
        )
        .bind(equipment_id)
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_active_schedules_for(
        &self,
        equipment_ids: &[i32],
    ) -> AppResult<Vec<MaintenanceScheduleEntry>> {
        if equipment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, MaintenanceScheduleEntry>(
            r#"
            SELECT * FROM maintenance_schedules
            WHERE active AND equipment_id = ANY($1)
            ORDER BY equipment_id, id
            "#,
        )
        .bind(equipment_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_schedulable(&self) -> AppResult<Vec<ScheduleWithEquipment>> {
        let rows = sqlx::query_as::<_, ScheduleWithEquipment>(
            r#"
            SELECT s.*, e.name AS equipment_name
            FROM maintenance_schedules s
            JOIN equipment e ON e.id = s.equipment_id
            WHERE s.active AND e.status = $1
            ORDER BY s.due_date NULLS LAST, s.id
            "#,
        )
        .bind(EquipmentStatus::Active)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_schedule(
        &self,
        schedule: &MaintenanceScheduleEntry,
    ) -> AppResult<MaintenanceScheduleEntry> {
        sqlx::query_as::<_, MaintenanceScheduleEntry>(
            r#"
            UPDATE maintenance_schedules
            SET interval_days = $1, anchor_date = $2, due_date = $3, label = $4,
                version = version + 1, modif_date = NOW()
            WHERE id = $5 AND version = $6 AND active
            RETURNING *
            "#,
        )
        .bind(schedule.interval_days)
        .bind(schedule.anchor_date)
        .bind(schedule.due_date)
        .bind(&schedule.label)
        .bind(schedule.id)
        .bind(schedule.version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| stale_schedule(schedule.id))
    }

    async fn set_schedule_active(
        &self,
        id: i32,
        active: bool,
    ) -> AppResult<Option<MaintenanceScheduleEntry>> {
        let row = sqlx::query_as::<_, MaintenanceScheduleEntry>(
            r#"
            UPDATE maintenance_schedules
            SET active = $1, version = version + 1, modif_date = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_schedule(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM maintenance_schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_schedules_for_equipment(&self, equipment_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM maintenance_schedules WHERE equipment_id = $1")
            .bind(equipment_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn record_performed(
        &self,
        event: &NewMaintenanceEvent,
        advanced: &MaintenanceScheduleEntry,
    ) -> AppResult<(MaintenanceEvent, MaintenanceScheduleEntry)> {
        let mut tx = self.pool.begin().await?;
        lock_active_equipment(&mut tx, event.equipment_id()).await?;

        // Version check serializes concurrent advances of the same schedule;
        // the loser rolls back together with its event
        let schedule = sqlx::query_as::<_, MaintenanceScheduleEntry>(
            r#"
            UPDATE maintenance_schedules
            SET anchor_date = $1, due_date = $2, version = version + 1, modif_date = NOW()
            WHERE id = $3 AND version = $4 AND active
            RETURNING *
            "#,
        )
        .bind(advanced.anchor_date)
        .bind(advanced.due_date)
        .bind(advanced.id)
        .bind(advanced.version)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| stale_schedule(advanced.id))?;

        let event = insert_event_in(&mut tx, event).await?;

        tx.commit().await?;
        Ok((event, schedule))
    }

    async fn insert_event(&self, event: &NewMaintenanceEvent) -> AppResult<MaintenanceEvent> {
        let mut tx = self.pool.begin().await?;
        lock_active_equipment(&mut tx, event.equipment_id()).await?;
        let row = insert_event_in(&mut tx, event).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn list_events(
        &self,
        equipment_id: i32,
        kind: Option<MaintenanceKind>,
    ) -> AppResult<Vec<MaintenanceEvent>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query_as::<_, MaintenanceEvent>(
                    r#"
                    SELECT * FROM maintenance_events
                    WHERE equipment_id = $1 AND kind = $2
                    ORDER BY performed_date DESC, id DESC
                    "#,
                )
                .bind(equipment_id)
                .bind(kind)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MaintenanceEvent>(
                    r#"
                    SELECT * FROM maintenance_events
                    WHERE equipment_id = $1
                    ORDER BY performed_date DESC, id DESC
                    "#,
                )
                .bind(equipment_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }
}
