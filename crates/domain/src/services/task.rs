//! Task service: role check, organization scoping, then the store.

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;
use crate::models::{AuditAction, AuthUser, CreateTaskInput, Task, TaskPatch};
use crate::services::audit::AuditLogBuilder;
use crate::services::policy::{authorize, Operation};
use crate::services::scope::ScopeResolver;
use crate::store::TaskStore;
use crate::time;

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    scopes: ScopeResolver,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, scopes: ScopeResolver) -> Self {
        Self { tasks, scopes }
    }

    /// Tasks in the caller's scope, newest first.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_tasks(&self, user: &AuthUser) -> Result<Vec<Task>, DomainError> {
        authorize(user, Operation::Read)?;
        let scope = self.scopes.allowed_org_ids_for(user).await?;
        Ok(self.tasks.list_in_orgs(scope.ids()).await?)
    }

    /// A single task. Out-of-scope tasks are indistinguishable from missing ones.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_task(&self, id: Uuid, user: &AuthUser) -> Result<Task, DomainError> {
        authorize(user, Operation::Read)?;
        self.find_scoped(id, user).await
    }

    #[instrument(skip(self, input, user), fields(user_id = %user.id))]
    pub async fn create_task(
        &self,
        input: CreateTaskInput,
        user: &AuthUser,
    ) -> Result<Task, DomainError> {
        authorize(user, Operation::Create)?;
        input.validate()?;

        let task = Task::new(input, user.id, user.organization_id, time::now());
        let audit = AuditLogBuilder::task_action(user, AuditAction::TaskCreated, task.id)
            .with_snapshot(task.snapshot())
            .build();

        self.tasks.insert_with_audit(&task, audit).await?;

        info!(task_id = %task.id, org_id = %task.organization_id, "Task created");
        Ok(task)
    }

    #[instrument(skip(self, patch, user), fields(user_id = %user.id))]
    pub async fn update_task(
        &self,
        id: Uuid,
        patch: TaskPatch,
        user: &AuthUser,
    ) -> Result<Task, DomainError> {
        authorize(user, Operation::Update)?;
        patch.validate()?;

        let mut task = self.find_scoped(id, user).await?;
        let before = task.snapshot();
        task.apply(patch, time::now());
        let after = task.snapshot();

        let audit = AuditLogBuilder::task_action(user, AuditAction::TaskUpdated, task.id)
            .with_diff(before, after)
            .build();

        if !self.tasks.update_with_audit(&task, audit).await? {
            return Err(DomainError::task_not_found());
        }

        info!(task_id = %task.id, "Task updated");
        Ok(task)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn delete_task(&self, id: Uuid, user: &AuthUser) -> Result<(), DomainError> {
        authorize(user, Operation::Delete)?;

        let task = self.find_scoped(id, user).await?;
        let audit = AuditLogBuilder::task_action(user, AuditAction::TaskDeleted, task.id)
            .with_snapshot(task.snapshot())
            .build();

        if !self.tasks.delete_with_audit(task.id, audit).await? {
            return Err(DomainError::task_not_found());
        }

        info!(task_id = %task.id, "Task deleted");
        Ok(())
    }

    async fn find_scoped(&self, id: Uuid, user: &AuthUser) -> Result<Task, DomainError> {
        let scope = self.scopes.allowed_org_ids_for(user).await?;
        self.tasks
            .find_in_orgs(id, scope.ids())
            .await?
            .ok_or_else(DomainError::task_not_found)
    }
}
