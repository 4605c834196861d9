//! Authentication routes: login and identity echo.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use domain::models::AuthUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Exchange email and password for a bearer token.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let result = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(LoginResponse {
        access_token: result.access_token,
        token_type: "Bearer".to_string(),
        expires_in: result.expires_in,
        user: result.user,
    }))
}

/// Identity carried by the presented token.
///
/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<AuthUser> {
    Json(user)
}
