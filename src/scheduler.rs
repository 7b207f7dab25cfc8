//! Greedy workload scheduler.
//!
//! Places a project's incomplete tasks onto the weekdays of a requested date
//! range. Every task receives the same estimate (available hours divided by
//! the number of incomplete tasks, floored, at least one hour), capped to a
//! single day. Tasks are never split across days. The result always carries
//! a best-effort plan; capacity shortfalls and due-date overruns are
//! reported as warnings.

use crate::calendar::WorkCalendar;
use crate::error::RequestError;
use crate::project::Project;
use crate::task::Task;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

pub const DEFAULT_DAILY_WORK_HOURS: u32 = 8;
pub const MAX_DAILY_WORK_HOURS: u32 = 24;

pub const NO_INCOMPLETE_TASKS_WARNING: &str = "No incomplete tasks to schedule";

fn default_daily_work_hours() -> u32 {
    DEFAULT_DAILY_WORK_HOURS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_daily_work_hours")]
    pub daily_work_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_task_ids: Option<Vec<i32>>,
}

impl ScheduleRequest {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, daily_work_hours: u32) -> Self {
        Self {
            start_date,
            end_date,
            daily_work_hours,
            priority_task_ids: None,
        }
    }

    pub fn with_priority_tasks(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.priority_task_ids = Some(ids.into_iter().collect());
        self
    }

    /// Boundary checks applied before a request reaches [`generate_schedule`].
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.start_date >= self.end_date {
            return Err(RequestError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(1..=MAX_DAILY_WORK_HOURS).contains(&self.daily_work_hours) {
            return Err(RequestError::DailyHoursOutOfRange(self.daily_work_hours));
        }
        Ok(())
    }

    fn priority_set(&self) -> HashSet<i32> {
        self.priority_task_ids
            .iter()
            .flatten()
            .copied()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub task_id: i32,
    pub title: String,
    pub scheduled_date: NaiveDate,
    pub estimated_hours: u32,
    pub priority: Priority,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub project_id: i32,
    pub project_title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_tasks: usize,
    pub scheduled_tasks: usize,
    pub schedule: Vec<ScheduledTask>,
    pub warnings: Vec<String>,
}

impl ScheduleResult {
    fn empty(project: &Project, request: &ScheduleRequest) -> Self {
        Self {
            project_id: project.id,
            project_title: project.title.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            total_tasks: 0,
            scheduled_tasks: 0,
            schedule: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Total hours placed on `date`.
    pub fn hours_on(&self, date: NaiveDate) -> u32 {
        self.schedule
            .iter()
            .filter(|entry| entry.scheduled_date == date)
            .map(|entry| entry.estimated_hours)
            .sum()
    }

    pub fn unscheduled_tasks(&self) -> usize {
        self.total_tasks.saturating_sub(self.scheduled_tasks)
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.total_tasks));
        parts.push(format!("scheduled={}", self.scheduled_tasks));
        if let Some(last) = self.schedule.iter().map(|entry| entry.scheduled_date).max() {
            parts.push(format!("finish={}", last));
        }
        if !self.warnings.is_empty() {
            parts.push(format!("warnings={}", self.warnings.len()));
        }
        parts.join(", ")
    }
}

type SortKey = (bool, NaiveDate, DateTime<Utc>, i32);

/// Orders tasks: priority tasks first, then by due date (missing due dates
/// last), then by creation time, then by id.
fn sort_key(task: &Task, priority: &HashSet<i32>) -> SortKey {
    (
        !priority.contains(&task.id),
        task.due_date.unwrap_or(NaiveDate::MAX),
        task.created_at,
        task.id,
    )
}

pub(crate) fn sort_by_priority<'a>(tasks: &[&'a Task], priority: &HashSet<i32>) -> Vec<&'a Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| sort_key(task, priority));
    sorted
}

fn schedule_reason(task: &Task, priority: Priority) -> String {
    if priority == Priority::High {
        return "User marked as priority".to_string();
    }
    match task.due_date {
        Some(due) => format!("Due date: {}", due.format("%Y-%m-%d")),
        None => "Scheduled based on creation order".to_string(),
    }
}

fn shortage_warning(remaining: usize) -> String {
    format!("Not enough time to schedule all tasks. {remaining} tasks remain unscheduled.")
}

fn overdue_warning(count: usize) -> String {
    format!("{count} task(s) scheduled after their due date.")
}

/// Builds a day-by-day plan for the incomplete tasks of `project`.
///
/// The request is assumed to have passed [`ScheduleRequest::validate`]; an
/// inverted range still produces a result (with zero capacity).
pub fn generate_schedule(project: &Project, request: &ScheduleRequest) -> ScheduleResult {
    let mut result = ScheduleResult::empty(project, request);

    let incomplete: Vec<&Task> = project.incomplete_tasks().collect();
    if incomplete.is_empty() {
        result.warnings.push(NO_INCOMPLETE_TASKS_WARNING.to_string());
        return result;
    }

    let daily_hours = request.daily_work_hours;
    let work_days =
        WorkCalendar::default().available_days_in_range(request.start_date, request.end_date);
    let total_available_hours = work_days.len() as u64 * u64::from(daily_hours);
    let estimated_hours_per_task = (total_available_hours / incomplete.len() as u64).max(1);
    let task_hours = estimated_hours_per_task.min(u64::from(daily_hours)) as u32;

    debug!(
        project_id = project.id,
        work_days = work_days.len(),
        total_available_hours,
        incomplete = incomplete.len(),
        task_hours,
        "computed scheduling capacity"
    );

    let priority = request.priority_set();
    let sorted = sort_by_priority(&incomplete, &priority);

    let mut current_day = 0usize;
    let mut current_day_hours = 0u32;

    for task in &sorted {
        if current_day >= work_days.len() {
            result
                .warnings
                .push(shortage_warning(sorted.len() - result.schedule.len()));
            break;
        }

        if current_day_hours.saturating_add(task_hours) > daily_hours {
            current_day += 1;
            current_day_hours = 0;

            if current_day >= work_days.len() {
                result
                    .warnings
                    .push(shortage_warning(sorted.len() - result.schedule.len()));
                break;
            }
        }

        let label = if priority.contains(&task.id) {
            Priority::High
        } else {
            Priority::Medium
        };

        result.schedule.push(ScheduledTask {
            task_id: task.id,
            title: task.title.clone(),
            scheduled_date: work_days[current_day],
            estimated_hours: task_hours,
            priority: label,
            reason: schedule_reason(task, label),
        });

        current_day_hours += task_hours;
    }

    if result.schedule.len() < sorted.len() {
        warn!(
            project_id = project.id,
            unscheduled = sorted.len() - result.schedule.len(),
            "capacity exhausted before all tasks were placed"
        );
    }

    // Placed entries are a prefix of the sorted order.
    let overdue = sorted
        .iter()
        .zip(&result.schedule)
        .filter(|(task, entry)| task.is_overdue_on(entry.scheduled_date))
        .count();
    if overdue > 0 {
        warn!(project_id = project.id, overdue, "tasks scheduled after their due date");
        result.warnings.push(overdue_warning(overdue));
    }

    result.total_tasks = incomplete.len();
    result.scheduled_tasks = result.schedule.len();
    result
}
