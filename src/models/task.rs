use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
    /// Free-text duration such as `"8h 30m"`.
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub hours_logged: Option<String>,
}

impl TaskRecord {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn is_assigned_to(&self, employee_id: &str) -> bool {
        self.assignee_ids.iter().any(|id| id == employee_id)
    }

    pub fn is_done_by(&self, employee_id: &str) -> bool {
        self.is_done() && self.is_assigned_to(employee_id)
    }
}
