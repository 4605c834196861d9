//! Bearer token authentication middleware.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::extractors::CurrentUser;

/// Rejects requests without a valid access token and stores the verified
/// identity in request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    match CurrentUser::from_request_parts(&mut parts, &state).await {
        Ok(CurrentUser(user)) => {
            tracing::debug!(user_id = %user.id, role = %user.role, "Authenticated request");
            parts.extensions.insert(user);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
