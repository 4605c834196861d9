//! Role policy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::models::{AuthUser, Role};

/// Operations subject to role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
    ReadAuditLog,
}

impl Operation {
    fn describe(&self) -> &'static str {
        match self {
            Operation::Read => "read tasks",
            Operation::Create => "create tasks",
            Operation::Update => "update tasks",
            Operation::Delete => "delete tasks",
            Operation::ReadAuditLog => "read audit logs",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::ReadAuditLog => "read_audit_log",
        };
        write!(f, "{}", name)
    }
}

pub fn can_perform(role: Role, operation: Operation) -> bool {
    match role {
        Role::Owner | Role::Admin => true,
        Role::Viewer => operation == Operation::Read,
    }
}

/// Fails with `Forbidden` when the caller's role may not perform `operation`.
pub fn authorize(user: &AuthUser, operation: Operation) -> Result<(), DomainError> {
    if can_perform(user.role, operation) {
        Ok(())
    } else {
        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            operation = %operation,
            "Operation denied by role policy"
        );
        Err(DomainError::Forbidden(format!(
            "{} cannot {}",
            user.role,
            operation.describe()
        )))
    }
}
