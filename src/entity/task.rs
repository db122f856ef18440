//! Task entity
//!
//! Table: org_task
//!
//! Observers and executors are linked through the `org_task_observer` and
//! `org_task_executor` join tables.

use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task lifecycle states. The wire format keeps the original
/// human-readable labels.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum TaskStatus {
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Done")]
    Done,
    #[sea_orm(string_value = "Canceled")]
    Canceled,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::New
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Case- and whitespace-insensitive parse; anything outside the fixed
    /// enumeration is rejected with the offending value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "new" => Ok(TaskStatus::New),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "canceled" => Ok(TaskStatus::Canceled),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "String(Some(256))")]
    pub title: String,

    #[sea_orm(column_type = "String(Some(2048))", nullable)]
    pub description: Option<String>,

    /// User who created the task
    pub author_id: i64,

    /// User accountable for the task
    pub responsible_id: i64,

    #[sea_orm(column_type = "String(Some(64))", nullable)]
    pub deadline: Option<String>,

    pub status: TaskStatus,

    pub estimated_time: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Task response with resolved participant ids
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author_id: i64,
    pub responsible_id: i64,
    pub observer_ids: Vec<i64>,
    pub executor_ids: Vec<i64>,
    pub deadline: Option<String>,
    pub status: TaskStatus,
    pub estimated_time: Option<f64>,
}

impl TaskResponse {
    pub fn from_parts(task: Model, observer_ids: Vec<i64>, executor_ids: Vec<i64>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            author_id: task.author_id,
            responsible_id: task.responsible_id,
            observer_ids,
            executor_ids,
            deadline: task.deadline,
            status: task.status,
            estimated_time: task.estimated_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_accepts_labels() {
        assert_eq!("New".parse::<TaskStatus>(), Ok(TaskStatus::New));
        assert_eq!("in progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("InProgress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("DONE".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert_eq!("Canceled".parse::<TaskStatus>(), Ok(TaskStatus::Canceled));
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!("Archived".parse::<TaskStatus>(), Err("Archived".to_string()));
        assert!("".parse::<TaskStatus>().is_err());
    }
}
