//! Startup seeding of organizations and users.
//!
//! Idempotent: organizations are matched by name and users by email, and
//! existing rows are left untouched.

use domain::models::{NewOrganization, NewUser, Organization};
use domain::store::Stores;
use domain::StoreError;
use shared::password::{hash_password, PasswordError};
use shared::validation::normalize_email;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::BootstrapConfig;

/// Error types for bootstrap seeding.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Counts of rows created by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub organizations_created: usize,
    pub users_created: usize,
}

/// Seeds the configured organizations and users if bootstrap is enabled.
pub async fn seed(
    stores: &Stores,
    config: &BootstrapConfig,
) -> Result<BootstrapReport, BootstrapError> {
    let mut report = BootstrapReport::default();
    if !config.enabled {
        return Ok(report);
    }

    let mut by_name: HashMap<String, Organization> = HashMap::new();

    for seed in &config.organizations {
        if let Some(existing) = stores.organizations.find_by_name(&seed.name).await? {
            by_name.insert(seed.name.clone(), existing);
            continue;
        }

        let parent_id = match &seed.parent {
            Some(parent) => Some(
                by_name
                    .get(parent)
                    .map(|p| p.id)
                    .ok_or_else(|| {
                        BootstrapError::Config(format!(
                            "organization '{}' references unknown parent '{}'",
                            seed.name, parent
                        ))
                    })?,
            ),
            None => None,
        };

        let org = stores
            .organizations
            .create(NewOrganization {
                name: seed.name.clone(),
                parent_id,
            })
            .await?;
        info!(org_id = %org.id, name = %org.name, "Seeded organization");
        report.organizations_created += 1;
        by_name.insert(seed.name.clone(), org);
    }

    for seed in &config.users {
        let email = normalize_email(&seed.email);
        if stores.users.find_by_email(&email).await?.is_some() {
            continue;
        }

        let org = match by_name.get(&seed.organization) {
            Some(org) => org.clone(),
            None => stores
                .organizations
                .find_by_name(&seed.organization)
                .await?
                .ok_or_else(|| {
                    BootstrapError::Config(format!(
                        "user '{}' references unknown organization '{}'",
                        email, seed.organization
                    ))
                })?,
        };

        let password = seed
            .password
            .as_deref()
            .unwrap_or(config.default_password.as_str());
        if password.is_empty() {
            return Err(BootstrapError::Config(format!(
                "no password configured for seed user '{}'",
                email
            )));
        }

        let created = stores
            .users
            .create(NewUser {
                email: email.clone(),
                password_hash: hash_password(password)?,
                role: seed.role,
                organization_id: org.id,
            })
            .await;

        match created {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, org_id = %org.id, "Seeded user");
                report.users_created += 1;
            }
            // Another instance seeded the same email concurrently.
            Err(StoreError::Conflict(_)) => {
                warn!(email = %email, "Seed user already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SeedOrganization, SeedUser};
    use domain::models::Role;
    use persistence::MemoryStore;
    use shared::password::verify_password;

    fn config() -> BootstrapConfig {
        BootstrapConfig {
            enabled: true,
            default_password: "password123".into(),
            organizations: vec![
                SeedOrganization {
                    name: "org-father".into(),
                    parent: None,
                },
                SeedOrganization {
                    name: "org-child".into(),
                    parent: Some("org-father".into()),
                },
            ],
            users: vec![
                SeedUser {
                    email: "owner@example.com".into(),
                    role: Role::Owner,
                    organization: "org-father".into(),
                    password: None,
                },
                SeedUser {
                    email: "Admin-Child@example.com".into(),
                    role: Role::Admin,
                    organization: "org-child".into(),
                    password: Some("child-secret".into()),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_seed_creates_hierarchy_and_hashed_users() {
        let stores = MemoryStore::new().into_stores();

        let report = seed(&stores, &config()).await.unwrap();
        assert_eq!(report.organizations_created, 2);
        assert_eq!(report.users_created, 2);

        let father = stores
            .organizations
            .find_by_name("org-father")
            .await
            .unwrap()
            .unwrap();
        let children = stores.organizations.list_children(father.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "org-child");

        let owner = stores
            .users
            .find_by_email("owner@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(owner.password_hash, "password123");
        assert!(verify_password("password123", &owner.password_hash).unwrap());

        let admin = stores
            .users
            .find_by_email("admin-child@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.email, "admin-child@example.com");
        assert_eq!(admin.organization_id, children[0].id);
        assert!(verify_password("child-secret", &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let stores = MemoryStore::new().into_stores();

        seed(&stores, &config()).await.unwrap();
        let second = seed(&stores, &config()).await.unwrap();
        assert_eq!(second, BootstrapReport::default());
    }

    #[tokio::test]
    async fn test_disabled_seed_does_nothing() {
        let stores = MemoryStore::new().into_stores();
        let mut config = config();
        config.enabled = false;

        assert_eq!(seed(&stores, &config).await.unwrap(), BootstrapReport::default());
        assert!(stores
            .organizations
            .find_by_name("org-father")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_parent_is_a_config_error() {
        let stores = MemoryStore::new().into_stores();
        let mut config = config();
        config.organizations.remove(0);

        let err = seed(&stores, &config).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Config(_)));
    }
}
