//! Audit log routes.

use axum::{extract::State, Json};
use domain::models::AuditLogEntry;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Audit entries in the caller's scope, newest first. OWNER and ADMIN only.
///
/// GET /api/audit-log
pub async fn list_audit_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AuditLogEntry>>, ApiError> {
    let entries = state.audit.query_by_caller(&user).await?;
    Ok(Json(entries))
}
