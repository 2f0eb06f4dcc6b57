//! Equipment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, EquipmentWithUrgency, RegisteredEquipment},
        maintenance::{EquipmentMaintenanceStatus, TodayQuery},
    },
    AppState,
};

use super::{date_or_today, validate_request, AuthenticatedUser};

/// List equipment with their overall maintenance urgency
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Vec<EquipmentWithUrgency>),
        (status = 400, description = "Invalid reference date")
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<EquipmentWithUrgency>>> {
    let today = date_or_today("today", query.today.as_deref())?;
    let equipment = state
        .services
        .equipment
        .list_with_urgency(&query.filter(), today)
        .await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Equipment>> {
    Ok(Json(state.services.equipment.get(id).await?))
}

/// Register equipment, optionally with initial maintenance schedules
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment registered", body = RegisteredEquipment),
        (status = 400, description = "Invalid request or schedule interval"),
        (status = 404, description = "Area or workstation not found")
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<RegisteredEquipment>)> {
    claims.require_admin()?;
    validate_request(&data)?;

    let registered = state.services.equipment.register(&data).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

/// Per-schedule and overall maintenance urgency of one equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/maintenance-status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID"),
        TodayQuery
    ),
    responses(
        (status = 200, description = "Maintenance status", body = EquipmentMaintenanceStatus),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn maintenance_status(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<TodayQuery>,
) -> AppResult<Json<EquipmentMaintenanceStatus>> {
    let today = date_or_today("today", query.today.as_deref())?;
    let status = state.services.maintenance.equipment_status(id, today).await?;
    Ok(Json(status))
}
