//! Task entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{TaskCategory, TaskStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for task_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatusDb {
    Open,
    InProgress,
    CodeReview,
    Done,
}

impl From<TaskStatusDb> for TaskStatus {
    fn from(db: TaskStatusDb) -> Self {
        match db {
            TaskStatusDb::Open => Self::Open,
            TaskStatusDb::InProgress => Self::InProgress,
            TaskStatusDb::CodeReview => Self::CodeReview,
            TaskStatusDb::Done => Self::Done,
        }
    }
}

impl From<TaskStatus> for TaskStatusDb {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Open => Self::Open,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::CodeReview => Self::CodeReview,
            TaskStatus::Done => Self::Done,
        }
    }
}

/// Database enum for task_category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_category", rename_all = "UPPERCASE")]
pub enum TaskCategoryDb {
    Core,
    Custom,
    Qa,
    Devops,
    Data,
}

impl From<TaskCategoryDb> for TaskCategory {
    fn from(db: TaskCategoryDb) -> Self {
        match db {
            TaskCategoryDb::Core => Self::Core,
            TaskCategoryDb::Custom => Self::Custom,
            TaskCategoryDb::Qa => Self::Qa,
            TaskCategoryDb::Devops => Self::Devops,
            TaskCategoryDb::Data => Self::Data,
        }
    }
}

impl From<TaskCategory> for TaskCategoryDb {
    fn from(category: TaskCategory) -> Self {
        match category {
            TaskCategory::Core => Self::Core,
            TaskCategory::Custom => Self::Custom,
            TaskCategory::Qa => Self::Qa,
            TaskCategory::Devops => Self::Devops,
            TaskCategory::Data => Self::Data,
        }
    }
}

/// Database row mapping for the tasks table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategoryDb,
    pub status: TaskStatusDb,
    pub owner_id: Option<Uuid>,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskEntity> for domain::models::Task {
    fn from(entity: TaskEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            category: entity.category.into(),
            status: entity.status.into(),
            owner_id: entity.owner_id,
            organization_id: entity.organization_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
