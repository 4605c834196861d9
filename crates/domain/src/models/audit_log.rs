//! Audit log domain models.
//!
//! Every task mutation leaves exactly one entry. Entries are append-only and
//! reference the actor and organization by id only, so they outlive users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::task::TaskSnapshot;

/// Audited task mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::TaskCreated => "TASK_CREATED",
            AuditAction::TaskUpdated => "TASK_UPDATED",
            AuditAction::TaskDeleted => "TASK_DELETED",
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TASK_CREATED" => Ok(AuditAction::TaskCreated),
            "TASK_UPDATED" => Ok(AuditAction::TaskUpdated),
            "TASK_DELETED" => Ok(AuditAction::TaskDeleted),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of entity an entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditEntity {
    Task,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntity::Task => "TASK",
        }
    }
}

impl FromStr for AuditEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TASK" => Ok(AuditEntity::Task),
            _ => Err(format!("Unknown audit entity: {}", s)),
        }
    }
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured payload attached to an entry.
///
/// Stored as JSON text; `encode` and `decode` are the only way in and out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditDetails {
    /// State at creation or deletion.
    Snapshot(TaskSnapshot),
    /// State before and after an update.
    Diff {
        before: TaskSnapshot,
        after: TaskSnapshot,
    },
}

impl AuditDetails {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Encodes for storage; a failure is logged and yields no details.
    pub fn encode_lossy(details: Option<&AuditDetails>) -> Option<String> {
        let details = details?;
        match details.encode() {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode audit details, storing none");
                None
            }
        }
    }

    /// Decodes stored text; unreadable payloads are logged and dropped.
    pub fn decode_lossy(raw: Option<&str>) -> Option<AuditDetails> {
        let raw = raw?;
        match Self::decode(raw) {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to decode stored audit details");
                None
            }
        }
    }
}

/// Input for appending an entry.
#[derive(Debug, Clone)]
pub struct NewAuditLogEntry {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: Uuid,
    pub details: Option<AuditDetails>,
}

/// A stored entry, enriched with the actor's email when the actor still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub organization_id: Uuid,
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: Uuid,
    pub details: Option<AuditDetails>,
}
