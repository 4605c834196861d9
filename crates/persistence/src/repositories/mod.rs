//! Postgres implementations of the domain store traits.

pub mod audit_log;
pub mod organization;
pub mod task;
pub mod user;

pub use audit_log::AuditLogRepository;
pub use organization::OrganizationRepository;
pub use task::TaskRepository;
pub use user::UserRepository;

use domain::store::Stores;
use domain::StoreError;
use sqlx::PgPool;
use std::sync::Arc;

const UNIQUE_VIOLATION: &str = "23505";

/// Maps sqlx failures onto the store error taxonomy.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict(db_err.message().to_string());
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// Builds the store set backed by the given pool.
pub fn postgres_stores(pool: PgPool) -> Stores {
    Stores {
        organizations: Arc::new(OrganizationRepository::new(pool.clone())),
        users: Arc::new(UserRepository::new(pool.clone())),
        tasks: Arc::new(TaskRepository::new(pool.clone())),
        audit_logs: Arc::new(AuditLogRepository::new(pool)),
    }
}
