//! Maintenance log and due-listing endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::maintenance::{
        DueMaintenance, DueQuery, EventDetails, EventQuery, MaintenanceEvent, PreventiveRecorded,
        RecordCorrective, RecordPreventive,
    },
    AppState,
};

use super::{date_or_today, validate_request, AuthenticatedUser};

/// Log preventive maintenance performed against a schedule
#[utoipa::path(
    post,
    path = "/maintenance/preventive",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = RecordPreventive,
    responses(
        (status = 201, description = "Maintenance recorded, schedule advanced", body = PreventiveRecorded),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Schedule not found or inactive"),
        (status = 409, description = "Schedule changed concurrently or equipment decommissioned")
    )
)]
pub async fn record_preventive(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<RecordPreventive>,
) -> AppResult<(StatusCode, Json<PreventiveRecorded>)> {
    claims.require_write_maintenance()?;
    validate_request(&request)?;

    let details = EventDetails {
        performed_date: date_or_today("performed_date", request.performed_date.as_deref())?,
        performed_by: request.performed_by.unwrap_or_else(|| claims.sub.clone()),
        description: request.description,
        notes: request.notes,
    };

    let recorded = state
        .services
        .maintenance
        .record_preventive(request.schedule_id, details)
        .await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// Log a corrective repair; schedules are not affected
#[utoipa::path(
    post,
    path = "/maintenance/corrective",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = RecordCorrective,
    responses(
        (status = 201, description = "Repair recorded", body = MaintenanceEvent),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment decommissioned")
    )
)]
pub async fn record_corrective(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<RecordCorrective>,
) -> AppResult<(StatusCode, Json<MaintenanceEvent>)> {
    claims.require_write_maintenance()?;
    validate_request(&request)?;

    let details = EventDetails {
        performed_date: date_or_today("performed_date", request.performed_date.as_deref())?,
        performed_by: request.performed_by.unwrap_or_else(|| claims.sub.clone()),
        description: Some(request.description),
        notes: request.notes,
    };

    let event = state
        .services
        .maintenance
        .record_corrective(request.equipment_id, details)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Maintenance history of an equipment, most recent first
#[utoipa::path(
    get,
    path = "/equipment/{id}/maintenance-events",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID"),
        EventQuery
    ),
    responses(
        (status = 200, description = "Maintenance events", body = Vec<MaintenanceEvent>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(equipment_id): Path<i32>,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<Vec<MaintenanceEvent>>> {
    let events = state
        .services
        .maintenance
        .list_events(equipment_id, query.kind)
        .await?;
    Ok(Json(events))
}

/// Upcoming and overdue maintenance across active equipment
#[utoipa::path(
    get,
    path = "/maintenance/due",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(DueQuery),
    responses(
        (status = 200, description = "Due maintenance, most urgent first", body = Vec<DueMaintenance>),
        (status = 400, description = "Invalid urgency filter or date")
    )
)]
pub async fn list_due(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<DueQuery>,
) -> AppResult<Json<Vec<DueMaintenance>>> {
    let today = date_or_today("today", query.today.as_deref())?;
    let due = state
        .services
        .maintenance
        .due_maintenance(today, query.urgency)
        .await?;
    Ok(Json(due))
}
