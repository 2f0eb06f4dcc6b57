//! Decommission records repository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use super::DecommissionStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        decommission::{DecommissionFilter, DecommissionRecord, DecommissionedEquipment, NewDecommission},
        equipment::Equipment,
        EquipmentStatus,
    },
};

#[derive(Clone)]
pub struct DecommissionsRepository {
    pool: Pool<Postgres>,
}

impl DecommissionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` wildcards so user input matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn decommissioned_from_row(row: &PgRow) -> DecommissionedEquipment {
    DecommissionedEquipment {
        equipment: Equipment {
            id: row.get("id"),
            name: row.get("name"),
            internal_code: row.get("internal_code"),
            description: row.get("description"),
            location_kind: row.get("location_kind"),
            area_id: row.get("area_id"),
            workstation_id: row.get("workstation_id"),
            responsible_name: row.get("responsible_name"),
            responsible_document: row.get("responsible_document"),
            status: row.get("status"),
            crea_date: row.get("crea_date"),
            modif_date: row.get("modif_date"),
        },
        decommission: DecommissionRecord {
            id: row.get("d_id"),
            equipment_id: row.get("id"),
            reason: row.get("d_reason"),
            notes: row.get("d_notes"),
            decommissioned_date: row.get("d_decommissioned_date"),
            decommissioned_by: row.get("d_decommissioned_by"),
            crea_date: row.get("d_crea_date"),
        },
    }
}

#[async_trait]
impl DecommissionStore for DecommissionsRepository {
    async fn decommission(&self, record: &NewDecommission) -> AppResult<DecommissionRecord> {
        let mut tx = self.pool.begin().await?;

        // Row lock: two concurrent decommissions of the same equipment queue
        // here and the second one sees the inactive status
        let status: Option<EquipmentStatus> =
            sqlx::query_scalar("SELECT status FROM equipment WHERE id = $1 FOR UPDATE")
                .bind(record.equipment_id)
                .fetch_optional(&mut *tx)
                .await?;

        match status {
            None => return Err(AppError::EquipmentNotFound(record.equipment_id)),
            Some(EquipmentStatus::Inactive) => {
                return Err(AppError::AlreadyInactive(record.equipment_id))
            }
            Some(EquipmentStatus::Active) => {}
        }

        sqlx::query("UPDATE equipment SET status = $1, modif_date = NOW() WHERE id = $2")
            .bind(EquipmentStatus::Inactive)
            .bind(record.equipment_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, DecommissionRecord>(
            r#"
            INSERT INTO decommissions (equipment_id, reason, notes, decommissioned_date, decommissioned_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(record.equipment_id)
        .bind(&record.reason)
        .bind(&record.notes)
        .bind(record.decommissioned_date)
        .bind(&record.decommissioned_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn get_decommission(&self, equipment_id: i32) -> AppResult<Option<DecommissionRecord>> {
        let row = sqlx::query_as::<_, DecommissionRecord>(
            "SELECT * FROM decommissions WHERE equipment_id = $1",
        )
        .bind(equipment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_decommissioned(
        &self,
        filter: &DecommissionFilter,
    ) -> AppResult<Vec<DecommissionedEquipment>> {
        let mut conditions = vec!["e.status = $1".to_string()];
        let mut idx = 2;

        if filter.from.is_some() {
            conditions.push(format!("d.decommissioned_date >= ${}", idx));
            idx += 1;
        }
        if filter.to.is_some() {
            conditions.push(format!("d.decommissioned_date <= ${}", idx));
            idx += 1;
        }
        if filter.reason.is_some() {
            conditions.push(format!("d.reason ILIKE ${} ESCAPE '\\'", idx));
        }

        let query = format!(
            r#"
            SELECT e.*,
                   d.id AS d_id, d.reason AS d_reason, d.notes AS d_notes,
                   d.decommissioned_date AS d_decommissioned_date,
                   d.decommissioned_by AS d_decommissioned_by,
                   d.crea_date AS d_crea_date
            FROM equipment e
            JOIN decommissions d ON d.equipment_id = e.id
            WHERE {}
            ORDER BY d.decommissioned_date DESC, e.id
            "#,
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query(&query).bind(EquipmentStatus::Inactive);
        if let Some(from) = filter.from {
            builder = builder.bind::<NaiveDate>(from);
        }
        if let Some(to) = filter.to {
            builder = builder.bind::<NaiveDate>(to);
        }
        if let Some(ref reason) = filter.reason {
            builder = builder.bind(format!("%{}%", escape_like(reason)));
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(decommissioned_from_row).collect())
    }
}
