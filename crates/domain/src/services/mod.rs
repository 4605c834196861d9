//! Domain services for Taskboard.
//!
//! Services contain business logic that operates on domain models and the
//! store traits.

pub mod audit;
pub mod policy;
pub mod scope;
pub mod task;

pub use audit::{AuditLogBuilder, AuditService};
pub use policy::{authorize, can_perform, Operation};
pub use scope::{OrgScope, ScopeResolver};
pub use task::TaskService;
