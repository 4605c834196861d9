//! Task repository for database operations.
//!
//! Each mutation and its audit entry share one transaction.

use async_trait::async_trait;
use domain::models::{NewAuditLogEntry, Task};
use domain::store::{StoreResult, TaskStore};
use sqlx::PgPool;
use uuid::Uuid;

use super::audit_log::insert_entry;
use super::store_error;
use crate::entities::{TaskCategoryDb, TaskEntity, TaskStatusDb};
use crate::metrics::QueryTimer;

/// Repository for task database operations.
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn list_in_orgs(&self, org_ids: &[Uuid]) -> StoreResult<Vec<Task>> {
        let _timer = QueryTimer::new("tasks.list_in_orgs");
        let entities = sqlx::query_as::<_, TaskEntity>(
            r#"
            SELECT id, title, description, category, status, owner_id, organization_id,
                   created_at, updated_at
            FROM tasks
            WHERE organization_id = ANY($1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(org_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn find_in_orgs(&self, id: Uuid, org_ids: &[Uuid]) -> StoreResult<Option<Task>> {
        let _timer = QueryTimer::new("tasks.find_in_orgs");
        let entity = sqlx::query_as::<_, TaskEntity>(
            r#"
            SELECT id, title, description, category, status, owner_id, organization_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND organization_id = ANY($2)
            "#,
        )
        .bind(id)
        .bind(org_ids)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entity.map(Into::into))
    }

    async fn insert_with_audit(&self, task: &Task, audit: NewAuditLogEntry) -> StoreResult<()> {
        let _timer = QueryTimer::new("tasks.insert_with_audit");
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, category, status, owner_id,
                               organization_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(TaskCategoryDb::from(task.category))
        .bind(TaskStatusDb::from(task.status))
        .bind(task.owner_id)
        .bind(task.organization_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        insert_entry(&mut *tx, &audit).await.map_err(store_error)?;

        tx.commit().await.map_err(store_error)
    }

    async fn update_with_audit(&self, task: &Task, audit: NewAuditLogEntry) -> StoreResult<bool> {
        let _timer = QueryTimer::new("tasks.update_with_audit");
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, category = $4, status = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(TaskCategoryDb::from(task.category))
        .bind(TaskStatusDb::from(task.status))
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        insert_entry(&mut *tx, &audit).await.map_err(store_error)?;
        tx.commit().await.map_err(store_error)?;
        Ok(true)
    }

    async fn delete_with_audit(&self, id: Uuid, audit: NewAuditLogEntry) -> StoreResult<bool> {
        let _timer = QueryTimer::new("tasks.delete_with_audit");
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        insert_entry(&mut *tx, &audit).await.map_err(store_error)?;
        tx.commit().await.map_err(store_error)?;
        Ok(true)
    }
}
