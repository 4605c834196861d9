//! Task domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_not_blank, MAX_TITLE_LENGTH};

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    CodeReview,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::CodeReview => "CODE_REVIEW",
            TaskStatus::Done => "DONE",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPEN" => Ok(TaskStatus::Open),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "CODE_REVIEW" => Ok(TaskStatus::CodeReview),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Board column a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskCategory {
    Core,
    Custom,
    Qa,
    Devops,
    Data,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Core => "CORE",
            TaskCategory::Custom => "CUSTOM",
            TaskCategory::Qa => "QA",
            TaskCategory::Devops => "DEVOPS",
            TaskCategory::Data => "DATA",
        }
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CORE" => Ok(TaskCategory::Core),
            "CUSTOM" => Ok(TaskCategory::Custom),
            "QA" => Ok(TaskCategory::Qa),
            "DEVOPS" => Ok(TaskCategory::Devops),
            "DATA" => Ok(TaskCategory::Data),
            _ => Err(format!("Invalid task category: {}", s)),
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work owned by one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub status: TaskStatus,
    pub owner_id: Option<Uuid>,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new task owned by `owner_id` in `organization_id`.
    pub fn new(
        input: CreateTaskInput,
        owner_id: Uuid,
        organization_id: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            category: input.category,
            status: input.status.unwrap_or_default(),
            owner_id: Some(owner_id),
            organization_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// The user-editable fields, as recorded in the audit log.
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            status: self.status,
        }
    }

    /// Applies a patch in place and refreshes `updated_at`.
    ///
    /// Ownership and organization are never touched.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    pub category: TaskCategory,

    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Partial update of a task.
///
/// Only these four fields can be changed; anything else in the request body,
/// including `ownerId` and `organizationId`, is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[serde(default)]
    pub title: Option<String>,

    /// `None` leaves the description alone, `Some(None)` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default)]
    pub category: Option<TaskCategory>,

    #[serde(default)]
    pub status: Option<TaskStatus>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Audit view of a task's editable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub status: TaskStatus,
}
