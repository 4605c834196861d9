//! User repository for database operations.

use async_trait::async_trait;
use domain::models::{NewUser, User};
use domain::store::{StoreResult, UserStore};
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;
use crate::entities::{UserEntity, UserRoleDb};
use crate::metrics::QueryTimer;

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let _timer = QueryTimer::new("users.find_by_email");
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, role, organization_id, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entity.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let _timer = QueryTimer::new("users.find_by_id");
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, role, organization_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entity.map(Into::into))
    }

    async fn create(&self, input: NewUser) -> StoreResult<User> {
        let _timer = QueryTimer::new("users.create");
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, password_hash, role, organization_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, role, organization_id, created_at, updated_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(UserRoleDb::from(input.role))
        .bind(input.organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entity.into())
    }
}
