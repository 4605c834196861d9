//! Audit logging service.
//!
//! Task mutations build their entry with [`AuditLogBuilder`] and hand it to the
//! task store, which commits it with the mutation. [`AuditService`] covers the
//! standalone append and the scoped read path.

use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{
    AuditAction, AuditDetails, AuditEntity, AuditLogEntry, AuthUser, NewAuditLogEntry,
    TaskSnapshot,
};
use crate::services::policy::{authorize, Operation};
use crate::services::scope::ScopeResolver;
use crate::store::AuditLogStore;

/// Fluent builder for audit entries.
#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
    user_id: Uuid,
    organization_id: Uuid,
    action: AuditAction,
    entity: AuditEntity,
    entity_id: Uuid,
    details: Option<AuditDetails>,
}

impl AuditLogBuilder {
    /// Entry for an action a user performed on a task. The entry is filed
    /// under the actor's own organization.
    pub fn task_action(actor: &AuthUser, action: AuditAction, task_id: Uuid) -> Self {
        Self {
            user_id: actor.id,
            organization_id: actor.organization_id,
            action,
            entity: AuditEntity::Task,
            entity_id: task_id,
            details: None,
        }
    }

    pub fn with_details(mut self, details: AuditDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_snapshot(self, snapshot: TaskSnapshot) -> Self {
        self.with_details(AuditDetails::Snapshot(snapshot))
    }

    pub fn with_diff(self, before: TaskSnapshot, after: TaskSnapshot) -> Self {
        self.with_details(AuditDetails::Diff { before, after })
    }

    pub fn build(self) -> NewAuditLogEntry {
        NewAuditLogEntry {
            user_id: self.user_id,
            organization_id: self.organization_id,
            action: self.action,
            entity: self.entity,
            entity_id: self.entity_id,
            details: self.details,
        }
    }
}

#[derive(Clone)]
pub struct AuditService {
    audit_logs: Arc<dyn AuditLogStore>,
    scopes: ScopeResolver,
}

impl AuditService {
    pub fn new(audit_logs: Arc<dyn AuditLogStore>, scopes: ScopeResolver) -> Self {
        Self { audit_logs, scopes }
    }

    /// Appends an entry outside of any task mutation.
    #[instrument(skip(self, actor, details), fields(user_id = %actor.id))]
    pub async fn append(
        &self,
        actor: &AuthUser,
        action: AuditAction,
        entity_id: Uuid,
        details: Option<AuditDetails>,
    ) -> Result<AuditLogEntry, DomainError> {
        let mut builder = AuditLogBuilder::task_action(actor, action, entity_id);
        if let Some(details) = details {
            builder = builder.with_details(details);
        }

        let entry = self.audit_logs.append(builder.build()).await?;
        debug!(entry_id = %entry.id, action = %entry.action, "Audit entry appended");
        Ok(entry)
    }

    /// Entries visible to the caller, newest first. VIEWER is refused.
    #[instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn query_by_caller(
        &self,
        caller: &AuthUser,
    ) -> Result<Vec<AuditLogEntry>, DomainError> {
        authorize(caller, Operation::ReadAuditLog)?;

        let scope = self.scopes.allowed_org_ids_for(caller).await?;
        let entries = self.audit_logs.list_in_orgs(scope.ids()).await?;

        debug!(
            org_count = scope.ids().len(),
            entry_count = entries.len(),
            "Audit log queried"
        );
        Ok(entries)
    }
}
