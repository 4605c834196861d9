//! In-memory storage backend for development and tests.
//!
//! All four stores share one lock, so a task mutation and its audit entry are
//! applied together or not at all. Audit details are kept as encoded JSON text,
//! as in the Postgres backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain::models::{
    AuditAction, AuditDetails, AuditEntity, AuditLogEntry, NewAuditLogEntry, NewOrganization,
    NewUser, Organization, Task, User,
};
use domain::store::{
    AuditLogStore, OrganizationStore, StoreResult, Stores, TaskStore, UserStore,
};
use domain::{time, StoreError};

#[derive(Debug, Clone)]
struct StoredAuditEntry {
    id: Uuid,
    created_at: DateTime<Utc>,
    user_id: Uuid,
    organization_id: Uuid,
    action: AuditAction,
    entity: AuditEntity,
    entity_id: Uuid,
    details: Option<String>,
}

#[derive(Default)]
struct MemoryData {
    organizations: Vec<Organization>,
    users: Vec<User>,
    /// Insertion order; list queries sort by `created_at`.
    tasks: Vec<Task>,
    audit_logs: Vec<StoredAuditEntry>,
}

impl MemoryData {
    fn append_audit(&mut self, entry: &NewAuditLogEntry) -> StoredAuditEntry {
        let stored = StoredAuditEntry {
            id: Uuid::new_v4(),
            created_at: time::now(),
            user_id: entry.user_id,
            organization_id: entry.organization_id,
            action: entry.action,
            entity: entry.entity,
            entity_id: entry.entity_id,
            details: AuditDetails::encode_lossy(entry.details.as_ref()),
        };
        self.audit_logs.push(stored.clone());
        stored
    }

    fn hydrate(&self, stored: &StoredAuditEntry) -> AuditLogEntry {
        let user_email = self
            .users
            .iter()
            .find(|u| u.id == stored.user_id)
            .map(|u| u.email.clone());

        AuditLogEntry {
            id: stored.id,
            created_at: stored.created_at,
            user_id: stored.user_id,
            user_email,
            organization_id: stored.organization_id,
            action: stored.action,
            entity: stored.entity,
            entity_id: stored.entity_id,
            details: AuditDetails::decode_lossy(stored.details.as_deref()),
        }
    }

    fn organization_exists(&self, id: Uuid) -> bool {
        self.organizations.iter().any(|o| o.id == id)
    }
}

/// Process-local store set.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes this backend through the domain store traits.
    pub fn into_stores(self) -> Stores {
        Stores {
            organizations: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            tasks: Arc::new(self.clone()),
            audit_logs: Arc::new(self),
        }
    }

    /// Overwrites the stored details text of an entry.
    ///
    /// Lets tests simulate rows written by an older, incompatible codec.
    pub async fn overwrite_audit_details(&self, entry_id: Uuid, raw: Option<String>) -> bool {
        let mut data = self.data.write().await;
        match data.audit_logs.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.details = raw;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>> {
        let data = self.data.read().await;
        Ok(data.organizations.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Organization>> {
        let data = self.data.read().await;
        Ok(data.organizations.iter().find(|o| o.name == name).cloned())
    }

    async fn list_children(&self, parent_id: Uuid) -> StoreResult<Vec<Organization>> {
        let data = self.data.read().await;
        Ok(data
            .organizations
            .iter()
            .filter(|o| o.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn create(&self, input: NewOrganization) -> StoreResult<Organization> {
        let mut data = self.data.write().await;

        if data.organizations.iter().any(|o| o.name == input.name) {
            return Err(StoreError::Conflict(format!(
                "organization '{}' already exists",
                input.name
            )));
        }
        if let Some(parent_id) = input.parent_id {
            if !data.organization_exists(parent_id) {
                return Err(StoreError::Backend(format!(
                    "parent organization {} does not exist",
                    parent_id
                )));
            }
        }

        let org = Organization {
            id: Uuid::new_v4(),
            name: input.name,
            parent_id: input.parent_id,
            created_at: time::now(),
        };
        data.organizations.push(org.clone());
        Ok(org)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, input: NewUser) -> StoreResult<User> {
        let mut data = self.data.write().await;

        if data
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(StoreError::Conflict(format!(
                "user '{}' already exists",
                input.email
            )));
        }
        if !data.organization_exists(input.organization_id) {
            return Err(StoreError::Backend(format!(
                "organization {} does not exist",
                input.organization_id
            )));
        }

        let now = time::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            organization_id: input.organization_id,
            created_at: now,
            updated_at: now,
        };
        data.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_in_orgs(&self, org_ids: &[Uuid]) -> StoreResult<Vec<Task>> {
        let data = self.data.read().await;
        let mut tasks: Vec<Task> = data
            .tasks
            .iter()
            .rev()
            .filter(|t| org_ids.contains(&t.organization_id))
            .cloned()
            .collect();
        // Stable sort keeps later inserts first on equal timestamps.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn find_in_orgs(&self, id: Uuid, org_ids: &[Uuid]) -> StoreResult<Option<Task>> {
        let data = self.data.read().await;
        Ok(data
            .tasks
            .iter()
            .find(|t| t.id == id && org_ids.contains(&t.organization_id))
            .cloned())
    }

    async fn insert_with_audit(&self, task: &Task, audit: NewAuditLogEntry) -> StoreResult<()> {
        let mut data = self.data.write().await;

        if data.tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::Conflict(format!("task {} already exists", task.id)));
        }
        if !data.organization_exists(task.organization_id) {
            return Err(StoreError::Backend(format!(
                "organization {} does not exist",
                task.organization_id
            )));
        }

        data.tasks.push(task.clone());
        data.append_audit(&audit);
        Ok(())
    }

    async fn update_with_audit(&self, task: &Task, audit: NewAuditLogEntry) -> StoreResult<bool> {
        let mut data = self.data.write().await;

        let Some(existing) = data.tasks.iter_mut().find(|t| t.id == task.id) else {
            return Ok(false);
        };
        existing.title = task.title.clone();
        existing.description = task.description.clone();
        existing.category = task.category;
        existing.status = task.status;
        existing.updated_at = task.updated_at;

        data.append_audit(&audit);
        Ok(true)
    }

    async fn delete_with_audit(&self, id: Uuid, audit: NewAuditLogEntry) -> StoreResult<bool> {
        let mut data = self.data.write().await;

        let Some(index) = data.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        data.tasks.remove(index);

        data.append_audit(&audit);
        Ok(true)
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn append(&self, entry: NewAuditLogEntry) -> StoreResult<AuditLogEntry> {
        let mut data = self.data.write().await;
        let stored = data.append_audit(&entry);
        Ok(data.hydrate(&stored))
    }

    async fn list_in_orgs(&self, org_ids: &[Uuid]) -> StoreResult<Vec<AuditLogEntry>> {
        let data = self.data.read().await;
        let mut entries: Vec<AuditLogEntry> = data
            .audit_logs
            .iter()
            .rev()
            .filter(|e| org_ids.contains(&e.organization_id))
            .map(|e| data.hydrate(e))
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}
