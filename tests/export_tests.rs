use chrono::{NaiveDate, TimeZone, Utc};
use std::fs;
use task_planner::{
    Project, ScheduleRequest, Task, generate_schedule, load_project_from_json,
    load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_result() -> task_planner::ScheduleResult {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    let project = Project::new(3, 1, "Export", created).with_tasks(vec![
        Task::new(1, 3, "Plan, then build", created).with_due_date(d(2025, 1, 6)),
        Task::new(2, 3, "Review", created + chrono::Duration::minutes(1)),
    ]);
    let request = ScheduleRequest::new(d(2025, 1, 6), d(2025, 1, 7), 6).with_priority_tasks([2]);
    generate_schedule(&project, &request)
}

#[test]
fn schedule_json_round_trips() {
    let result = sample_result();
    let tmp = NamedTempFile::new().expect("create temp file");

    save_schedule_to_json(&result, tmp.path()).unwrap();
    let loaded = load_schedule_from_json(tmp.path()).unwrap();

    assert_eq!(loaded, result);
}

#[test]
fn schedule_csv_has_one_row_per_entry() {
    let result = sample_result();
    let tmp = NamedTempFile::new().expect("create temp file");

    save_schedule_to_csv(&result, tmp.path()).unwrap();
    let contents = fs::read_to_string(tmp.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(
        lines[0],
        "task_id,title,scheduled_date,estimated_hours,priority,reason"
    );
    assert_eq!(lines.len(), 1 + result.schedule.len());
    assert_eq!(lines[1], "2,Review,2025-01-06,6,High,User marked as priority");
    assert_eq!(
        lines[2],
        "1,\"Plan, then build\",2025-01-07,6,Medium,Due date: 2025-01-06"
    );
}

#[test]
fn project_snapshot_loads_from_camel_case_json() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let json = r#"{
        "id": 9,
        "ownerId": 2,
        "title": "From disk",
        "createdAt": "2025-01-01T08:00:00Z",
        "tasks": [
            {"id": 1, "title": "a", "projectId": 9, "createdAt": "2025-01-01T08:01:00Z"},
            {"id": 2, "title": "b", "projectId": 9, "createdAt": "2025-01-01T08:02:00Z",
             "dueDate": "2025-01-08", "isCompleted": true}
        ]
    }"#;
    fs::write(tmp.path(), json).unwrap();

    let project = load_project_from_json(tmp.path()).unwrap();

    assert_eq!(project.id, 9);
    assert_eq!(project.tasks.len(), 2);
    assert!(!project.tasks[0].is_completed);
    assert_eq!(project.tasks[1].due_date, Some(d(2025, 1, 8)));
    assert_eq!(project.incomplete_tasks().count(), 1);
}

#[test]
fn missing_project_file_is_an_io_error() {
    let err = load_project_from_json("/nonexistent/project.json").unwrap_err();
    assert!(matches!(err, task_planner::ExportError::Io(_)));
}
