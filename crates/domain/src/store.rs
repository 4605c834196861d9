//! Storage traits implemented by the persistence layer.
//!
//! Every task and audit read takes the caller's allowed organization ids;
//! stores never return rows outside that set.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AuditLogEntry, NewAuditLogEntry, NewOrganization, NewUser, Organization, Task, User,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>>;

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Organization>>;

    /// Direct children only; grandchildren are not returned.
    async fn list_children(&self, parent_id: Uuid) -> StoreResult<Vec<Organization>>;

    async fn create(&self, input: NewOrganization) -> StoreResult<Organization>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> StoreResult<()>;
}

/// Credential lookup used by the login flow.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn create(&self, input: NewUser) -> StoreResult<User>;
}

/// Task persistence. Mutations write their audit entry in the same atomic unit.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks in any of `org_ids`, newest first.
    async fn list_in_orgs(&self, org_ids: &[Uuid]) -> StoreResult<Vec<Task>>;

    async fn find_in_orgs(&self, id: Uuid, org_ids: &[Uuid]) -> StoreResult<Option<Task>>;

    async fn insert_with_audit(&self, task: &Task, audit: NewAuditLogEntry) -> StoreResult<()>;

    /// Returns `false` when the task no longer exists.
    async fn update_with_audit(&self, task: &Task, audit: NewAuditLogEntry) -> StoreResult<bool>;

    /// Returns `false` when the task no longer exists.
    async fn delete_with_audit(&self, id: Uuid, audit: NewAuditLogEntry) -> StoreResult<bool>;
}

#[async_trait]
pub trait AuditLogStore: Send + Sync {
    async fn append(&self, entry: NewAuditLogEntry) -> StoreResult<AuditLogEntry>;

    /// Entries in any of `org_ids`, newest first, with actor emails joined in.
    async fn list_in_orgs(&self, org_ids: &[Uuid]) -> StoreResult<Vec<AuditLogEntry>>;
}

/// The full set of stores a backend provides.
#[derive(Clone)]
pub struct Stores {
    pub organizations: Arc<dyn OrganizationStore>,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub audit_logs: Arc<dyn AuditLogStore>,
}
