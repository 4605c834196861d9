//! Authenticated caller extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use domain::models::AuthUser;

use crate::app::AppState;
use crate::error::ApiError;

/// Verified identity of the caller.
///
/// Reuses the identity stored by [`require_user_auth`](crate::middleware::require_user_auth)
/// when present; otherwise validates the `Authorization: Bearer` header itself.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(CurrentUser(user.clone()));
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        ApiError::Unauthorized("Missing Authorization header".to_string())
                    } else {
                        ApiError::Unauthorized("Invalid Authorization header format".to_string())
                    }
                })?;

        let user = state.auth.verify(bearer.token())?;
        Ok(CurrentUser(user))
    }
}
