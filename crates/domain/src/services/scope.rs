//! Organization scoping.
//!
//! An OWNER of a parent organization sees its direct children as well;
//! everyone else is confined to their own organization.

use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{AuthUser, Role};
use crate::store::OrganizationStore;

/// Set of organization ids a caller may touch. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgScope(Vec<Uuid>);

impl OrgScope {
    pub fn single(org_id: Uuid) -> Self {
        Self(vec![org_id])
    }

    fn with_children(org_id: Uuid, children: impl IntoIterator<Item = Uuid>) -> Self {
        let mut ids = vec![org_id];
        for child in children {
            if !ids.contains(&child) {
                ids.push(child);
            }
        }
        Self(ids)
    }

    pub fn contains(&self, org_id: Uuid) -> bool {
        self.0.contains(&org_id)
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.0
    }
}

#[derive(Clone)]
pub struct ScopeResolver {
    organizations: Arc<dyn OrganizationStore>,
}

impl ScopeResolver {
    pub fn new(organizations: Arc<dyn OrganizationStore>) -> Self {
        Self { organizations }
    }

    /// Computes the organizations reachable from `org_id`: itself plus its
    /// direct children. An unknown id resolves to itself alone.
    pub async fn resolve_allowed_org_ids(&self, org_id: Uuid) -> Result<OrgScope, DomainError> {
        let Some(org) = self.organizations.find_by_id(org_id).await? else {
            warn!(org_id = %org_id, "Caller organization not found, scoping to itself");
            return Ok(OrgScope::single(org_id));
        };

        let children = self.organizations.list_children(org.id).await?;
        let scope = OrgScope::with_children(org.id, children.into_iter().map(|c| c.id));

        debug!(org_id = %org.id, org_count = scope.ids().len(), "Resolved organization scope");
        Ok(scope)
    }

    /// Scope for a caller: OWNER expands to children, other roles never hit
    /// the store.
    pub async fn allowed_org_ids_for(&self, user: &AuthUser) -> Result<OrgScope, DomainError> {
        match user.role {
            Role::Owner => self.resolve_allowed_org_ids(user.organization_id).await,
            Role::Admin | Role::Viewer => Ok(OrgScope::single(user.organization_id)),
        }
    }
}
