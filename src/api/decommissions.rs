//! Decommissioning endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        decommission::{
            DecommissionFilter, DecommissionQuery, DecommissionRecord, DecommissionRequest,
            DecommissionedEquipment,
        },
        parse_optional_date,
    },
    AppState,
};

use super::{date_or_today, validate_request, AuthenticatedUser};

/// Take equipment out of service
#[utoipa::path(
    post,
    path = "/equipment/{id}/decommission",
    tag = "decommissions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = DecommissionRequest,
    responses(
        (status = 201, description = "Equipment decommissioned", body = DecommissionRecord),
        (status = 400, description = "Reason missing"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment already inactive")
    )
)]
pub async fn decommission_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(equipment_id): Path<i32>,
    Json(request): Json<DecommissionRequest>,
) -> AppResult<(StatusCode, Json<DecommissionRecord>)> {
    claims.require_admin()?;
    validate_request(&request)?;

    let date = date_or_today("decommissioned_date", request.decommissioned_date.as_deref())?;
    let by = request.decommissioned_by.as_deref().unwrap_or(&claims.sub);

    let record = state
        .services
        .decommission
        .decommission(equipment_id, &request.reason, request.notes, by, date)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Decommission record of one equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/decommission",
    tag = "decommissions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Decommission record", body = DecommissionRecord),
        (status = 404, description = "Equipment was never decommissioned")
    )
)]
pub async fn get_decommission(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(equipment_id): Path<i32>,
) -> AppResult<Json<DecommissionRecord>> {
    Ok(Json(state.services.decommission.get_record(equipment_id).await?))
}

/// List decommissioned equipment
#[utoipa::path(
    get,
    path = "/decommissions",
    tag = "decommissions",
    security(("bearer_auth" = [])),
    params(DecommissionQuery),
    responses(
        (status = 200, description = "Decommissioned equipment, newest first", body = Vec<DecommissionedEquipment>),
        (status = 400, description = "Invalid date range")
    )
)]
pub async fn list_decommissions(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<DecommissionQuery>,
) -> AppResult<Json<Vec<DecommissionedEquipment>>> {
    let filter = DecommissionFilter {
        from: parse_optional_date("from", query.from.as_deref())?,
        to: parse_optional_date("to", query.to.as_deref())?,
        reason: query.reason.filter(|r| !r.trim().is_empty()),
    };

    let listed = state.services.decommission.list_decommissioned(&filter).await?;
    Ok(Json(listed))
}
