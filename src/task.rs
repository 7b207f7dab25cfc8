use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub project_id: i32,
}

impl Task {
    pub fn new(
        id: i32,
        project_id: i32,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            due_date: None,
            is_completed: false,
            created_at,
            project_id,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    /// True when the task is placed on a date strictly after its due date.
    pub fn is_overdue_on(&self, date: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| date > due)
    }
}

/// Payload for creating a task. New tasks always start incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub project_id: i32,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

impl TaskUpdate {
    pub(crate) fn apply_to(&self, task: &mut Task) {
        task.title = self.title.clone();
        task.due_date = self.due_date;
        task.is_completed = self.is_completed;
    }
}
