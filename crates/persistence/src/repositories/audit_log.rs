//! Audit log repository for database operations.

use async_trait::async_trait;
use domain::models::{AuditDetails, AuditLogEntry, NewAuditLogEntry};
use domain::store::{AuditLogStore, StoreResult};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::store_error;
use crate::entities::{AuditActionDb, AuditLogEntity};
use crate::metrics::QueryTimer;

/// Repository for the append-only audit log.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Inserts an entry on an existing connection or transaction and returns it
/// joined with the actor's email.
pub(crate) async fn insert_entry(
    conn: &mut PgConnection,
    entry: &NewAuditLogEntry,
) -> Result<AuditLogEntity, sqlx::Error> {
    let details = AuditDetails::encode_lossy(entry.details.as_ref());

    sqlx::query_as::<_, AuditLogEntity>(
        r#"
        WITH inserted AS (
            INSERT INTO audit_logs (user_id, organization_id, action, entity, entity_id, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at, user_id, organization_id, action, entity, entity_id, details
        )
        SELECT i.id, i.created_at, i.user_id, u.email AS user_email, i.organization_id,
               i.action, i.entity, i.entity_id, i.details
        FROM inserted i
        LEFT JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.organization_id)
    .bind(AuditActionDb::from(entry.action))
    .bind(entry.entity.as_str())
    .bind(entry.entity_id)
    .bind(details)
    .fetch_one(conn)
    .await
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn append(&self, entry: NewAuditLogEntry) -> StoreResult<AuditLogEntry> {
        let _timer = QueryTimer::new("audit_logs.append");
        let mut conn = self.pool.acquire().await.map_err(store_error)?;
        let entity = insert_entry(&mut *conn, &entry).await.map_err(store_error)?;
        Ok(entity.into())
    }

    async fn list_in_orgs(&self, org_ids: &[Uuid]) -> StoreResult<Vec<AuditLogEntry>> {
        let _timer = QueryTimer::new("audit_logs.list_in_orgs");
        let entities = sqlx::query_as::<_, AuditLogEntity>(
            r#"
            SELECT a.id, a.created_at, a.user_id, u.email AS user_email, a.organization_id,
                   a.action, a.entity, a.entity_id, a.details
            FROM audit_logs a
            LEFT JOIN users u ON u.id = a.user_id
            WHERE a.organization_id = ANY($1)
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )
        .bind(org_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
