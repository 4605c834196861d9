//! Audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AuditAction, AuditDetails, AuditEntity};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for audit_action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditActionDb {
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
}

impl From<AuditActionDb> for AuditAction {
    fn from(db: AuditActionDb) -> Self {
        match db {
            AuditActionDb::TaskCreated => Self::TaskCreated,
            AuditActionDb::TaskUpdated => Self::TaskUpdated,
            AuditActionDb::TaskDeleted => Self::TaskDeleted,
        }
    }
}

impl From<AuditAction> for AuditActionDb {
    fn from(action: AuditAction) -> Self {
        match action {
            AuditAction::TaskCreated => Self::TaskCreated,
            AuditAction::TaskUpdated => Self::TaskUpdated,
            AuditAction::TaskDeleted => Self::TaskDeleted,
        }
    }
}

/// Audit row joined with the actor's email.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub organization_id: Uuid,
    pub action: AuditActionDb,
    pub entity: String,
    pub entity_id: Uuid,
    pub details: Option<String>,
}

impl From<AuditLogEntity> for domain::models::AuditLogEntry {
    fn from(entity: AuditLogEntity) -> Self {
        let kind = entity.entity.parse().unwrap_or_else(|e: String| {
            tracing::warn!(entry_id = %entity.id, error = %e, "Unexpected audit entity kind");
            AuditEntity::Task
        });

        Self {
            id: entity.id,
            created_at: entity.created_at,
            user_id: entity.user_id,
            user_email: entity.user_email,
            organization_id: entity.organization_id,
            action: entity.action.into(),
            entity: kind,
            entity_id: entity.entity_id,
            details: AuditDetails::decode_lossy(entity.details.as_deref()),
        }
    }
}
