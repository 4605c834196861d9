//! Organization entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the organizations table.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationEntity {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<OrganizationEntity> for domain::models::Organization {
    fn from(entity: OrganizationEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            parent_id: entity.parent_id,
            created_at: entity.created_at,
        }
    }
}
