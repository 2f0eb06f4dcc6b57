//! Maintenance schedule endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::maintenance::{AttachSchedule, MaintenanceScheduleEntry, ScheduleQuery, UpdateSchedule},
    AppState,
};

use super::{validate_request, AuthenticatedUser};

/// Bulk detach response
#[derive(Serialize, ToSchema)]
pub struct DetachedResponse {
    /// Number of schedules removed
    pub removed: u64,
}

/// List schedules of an equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/schedules",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID"),
        ScheduleQuery
    ),
    responses(
        (status = 200, description = "Schedules", body = Vec<MaintenanceScheduleEntry>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(equipment_id): Path<i32>,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<Vec<MaintenanceScheduleEntry>>> {
    let schedules = state
        .services
        .maintenance
        .list_schedules(equipment_id, query.include_inactive.unwrap_or(false))
        .await?;
    Ok(Json(schedules))
}

/// Attach a maintenance schedule to an equipment
#[utoipa::path(
    post,
    path = "/equipment/{id}/schedules",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = AttachSchedule,
    responses(
        (status = 201, description = "Schedule attached", body = MaintenanceScheduleEntry),
        (status = 400, description = "Interval must be positive"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment is decommissioned")
    )
)]
pub async fn attach_schedule(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(equipment_id): Path<i32>,
    Json(request): Json<AttachSchedule>,
) -> AppResult<(StatusCode, Json<MaintenanceScheduleEntry>)> {
    claims.require_write_maintenance()?;
    validate_request(&request)?;

    let entry = state
        .services
        .maintenance
        .attach_schedule(equipment_id, request.to_spec()?)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove every schedule of an equipment (event history is kept)
#[utoipa::path(
    delete,
    path = "/equipment/{id}/schedules",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Schedules removed", body = DetachedResponse),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn detach_all(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(equipment_id): Path<i32>,
) -> AppResult<Json<DetachedResponse>> {
    claims.require_admin()?;

    let removed = state.services.maintenance.detach_all(equipment_id).await?;
    Ok(Json(DetachedResponse { removed }))
}

/// Update interval, anchor date or label of a schedule
#[utoipa::path(
    put,
    path = "/schedules/{id}",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Schedule ID")),
    request_body = UpdateSchedule,
    responses(
        (status = 200, description = "Schedule updated", body = MaintenanceScheduleEntry),
        (status = 400, description = "Interval must be positive"),
        (status = 404, description = "Schedule not found or inactive"),
        (status = 409, description = "Schedule changed concurrently")
    )
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateSchedule>,
) -> AppResult<Json<MaintenanceScheduleEntry>> {
    claims.require_write_maintenance()?;
    validate_request(&request)?;

    let entry = state
        .services
        .maintenance
        .update_schedule(id, &request.to_changes()?)
        .await?;
    Ok(Json(entry))
}

/// Deactivate a schedule, keeping it for history
#[utoipa::path(
    post,
    path = "/schedules/{id}/deactivate",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule deactivated", body = MaintenanceScheduleEntry),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn deactivate_schedule(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenanceScheduleEntry>> {
    claims.require_write_maintenance()?;

    let entry = state.services.maintenance.deactivate_schedule(id).await?;
    Ok(Json(entry))
}

/// Delete one schedule
#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn detach_schedule(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_maintenance()?;

    state.services.maintenance.detach_one(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
