//! Task routes.
//!
//! Handlers only translate HTTP to [`TaskService`](domain::services::TaskService)
//! calls; scoping, role checks and auditing happen in the service.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use domain::models::{AuditAction, AuthUser, CreateTaskInput, Task, TaskPatch};
use domain::services::{authorize, Operation};
use domain::DomainError;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::record_task_mutation;

/// Unwraps a request body. Role checks run before body errors are reported.
fn require_body<T>(
    body: Result<Json<T>, JsonRejection>,
    user: &AuthUser,
    operation: Operation,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            authorize(user, operation)?;
            Err(rejection.into())
        }
    }
}

/// Unwraps a task id. A malformed id is reported like any missing task.
fn require_task_id(
    id: Result<Path<Uuid>, PathRejection>,
    user: &AuthUser,
    operation: Operation,
) -> Result<Uuid, ApiError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(_) => {
            authorize(user, operation)?;
            Err(DomainError::task_not_found().into())
        }
    }
}

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.tasks.list_tasks(&user).await?;
    Ok(Json(tasks))
}

/// GET /api/tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = require_task_id(id, &user, Operation::Read)?;
    let task = state.tasks.get_task(id, &user).await?;
    Ok(Json(task))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = require_body(body, &user, Operation::Create)?;

    let task = state.tasks.create_task(input, &user).await?;
    record_task_mutation(AuditAction::TaskCreated);

    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT or PATCH /api/tasks/:id
///
/// Only title, description, category and status are applied; owner and
/// organization are never taken from the body.
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = require_task_id(id, &user, Operation::Update)?;
    let patch = require_body(body, &user, Operation::Update)?;

    let task = state.tasks.update_task(id, patch, &user).await?;
    record_task_mutation(AuditAction::TaskUpdated);

    Ok(Json(task))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = require_task_id(id, &user, Operation::Delete)?;

    state.tasks.delete_task(id, &user).await?;
    record_task_mutation(AuditAction::TaskDeleted);

    Ok(StatusCode::NO_CONTENT)
}
