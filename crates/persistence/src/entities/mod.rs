//! Database entity definitions.

pub mod audit_log;
pub mod organization;
pub mod task;
pub mod user;

pub use audit_log::{AuditActionDb, AuditLogEntity};
pub use organization::OrganizationEntity;
pub use task::{TaskCategoryDb, TaskEntity, TaskStatusDb};
pub use user::{UserEntity, UserRoleDb};
