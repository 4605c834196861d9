//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Role;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum UserRoleDb {
    Owner,
    Admin,
    Viewer,
}

impl From<UserRoleDb> for Role {
    fn from(db: UserRoleDb) -> Self {
        match db {
            UserRoleDb::Owner => Self::Owner,
            UserRoleDb::Admin => Self::Admin,
            UserRoleDb::Viewer => Self::Viewer,
        }
    }
}

impl From<Role> for UserRoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::Owner => Self::Owner,
            Role::Admin => Self::Admin,
            Role::Viewer => Self::Viewer,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: UserRoleDb,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            role: entity.role.into(),
            organization_id: entity.organization_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
