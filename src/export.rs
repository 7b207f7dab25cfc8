use crate::error::ExportResult;
use crate::project::Project;
use crate::scheduler::ScheduleResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct ScheduledTaskCsvRecord {
    task_id: i32,
    title: String,
    scheduled_date: String,
    estimated_hours: u32,
    priority: String,
    reason: String,
}

pub fn save_schedule_to_json<P: AsRef<Path>>(result: &ScheduleResult, path: P) -> ExportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> ExportResult<ScheduleResult> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Writes one row per scheduled task. Warnings are not part of the CSV.
pub fn save_schedule_to_csv<P: AsRef<Path>>(result: &ScheduleResult, path: P) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for entry in &result.schedule {
        writer.serialize(ScheduledTaskCsvRecord {
            task_id: entry.task_id,
            title: entry.title.clone(),
            scheduled_date: entry.scheduled_date.format("%Y-%m-%d").to_string(),
            estimated_hours: entry.estimated_hours,
            priority: entry.priority.to_string(),
            reason: entry.reason.clone(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> ExportResult<Project> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}
