//! API handlers for Assetlog REST endpoints

pub mod decommissions;
pub mod equipment;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod schedules;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::NaiveDate;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{parse_optional_date, user::UserClaims},
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Parse an optional `YYYY-MM-DD` parameter, falling back to the local date
pub(crate) fn date_or_today(field: &str, value: Option<&str>) -> AppResult<NaiveDate> {
    Ok(parse_optional_date(field, value)?.unwrap_or_else(|| chrono::Local::now().date_naive()))
}

/// Run `validator` rules on a request body
pub(crate) fn validate_request<T: Validate>(data: &T) -> AppResult<()> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}
