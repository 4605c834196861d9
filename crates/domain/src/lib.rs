//! Domain layer for the Taskboard backend.
//!
//! This crate contains:
//! - Domain models (Organization, User, Task, AuditLogEntry)
//! - Store traits implemented by the persistence layer
//! - Organization scoping, role policy, task and audit services
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time;

pub use error::{DomainError, StoreError};
