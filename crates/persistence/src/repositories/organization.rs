//! Organization repository for database operations.

use async_trait::async_trait;
use domain::models::{NewOrganization, Organization};
use domain::store::{OrganizationStore, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;
use crate::entities::OrganizationEntity;
use crate::metrics::QueryTimer;

/// Repository for organization database operations.
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationStore for OrganizationRepository {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>> {
        let _timer = QueryTimer::new("organizations.find_by_id");
        let entity = sqlx::query_as::<_, OrganizationEntity>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entity.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Organization>> {
        let _timer = QueryTimer::new("organizations.find_by_name");
        let entity = sqlx::query_as::<_, OrganizationEntity>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM organizations
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entity.map(Into::into))
    }

    async fn list_children(&self, parent_id: Uuid) -> StoreResult<Vec<Organization>> {
        let _timer = QueryTimer::new("organizations.list_children");
        let entities = sqlx::query_as::<_, OrganizationEntity>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM organizations
            WHERE parent_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: NewOrganization) -> StoreResult<Organization> {
        let _timer = QueryTimer::new("organizations.create");
        let entity = sqlx::query_as::<_, OrganizationEntity>(
            r#"
            INSERT INTO organizations (name, parent_id)
            VALUES ($1, $2)
            RETURNING id, name, parent_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entity.into())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}
