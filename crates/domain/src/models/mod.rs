//! Domain models for Taskboard.

pub mod audit_log;
pub mod organization;
pub mod task;
pub mod user;

pub use audit_log::{AuditAction, AuditDetails, AuditEntity, AuditLogEntry, NewAuditLogEntry};
pub use organization::{NewOrganization, Organization};
pub use task::{CreateTaskInput, Task, TaskCategory, TaskPatch, TaskSnapshot, TaskStatus};
pub use user::{AuthUser, NewUser, Role, User};
