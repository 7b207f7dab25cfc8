use chrono::NaiveDate;
use std::sync::Arc;
use task_planner::{
    MemoryProjectStore, NewProject, NewTask, ProjectStore, RequestError, ScheduleRequest,
    SchedulerService, ServiceError,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_service() -> (SchedulerService<MemoryProjectStore>, i32) {
    let store = Arc::new(MemoryProjectStore::new());
    let project = store
        .create_project(
            5,
            NewProject {
                title: "Launch".to_string(),
                description: None,
            },
        )
        .unwrap();
    for (title, due) in [("write docs", None), ("ship", Some(d(2025, 1, 7)))] {
        store
            .create_task(
                5,
                NewTask {
                    project_id: project.id,
                    title: title.to_string(),
                    due_date: due,
                },
            )
            .unwrap()
            .unwrap();
    }
    (SchedulerService::new(store), project.id)
}

#[test]
fn schedules_an_owned_project() {
    let (service, project_id) = seeded_service();
    let request = ScheduleRequest::new(d(2025, 1, 6), d(2025, 1, 7), 8);

    let result = service.generate_schedule(project_id, &request, 5).unwrap();

    assert_eq!(result.project_title, "Launch");
    assert_eq!(result.total_tasks, 2);
    let titles: Vec<&str> = result.schedule.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["ship", "write docs"]);
}

#[test]
fn foreign_or_missing_projects_are_not_found() {
    let (service, project_id) = seeded_service();
    let request = ScheduleRequest::new(d(2025, 1, 6), d(2025, 1, 7), 8);

    let err = service.generate_schedule(project_id, &request, 6).unwrap_err();
    assert!(matches!(err, ServiceError::ProjectNotFound(id) if id == project_id));

    let err = service.generate_schedule(999, &request, 5).unwrap_err();
    assert!(matches!(err, ServiceError::ProjectNotFound(999)));
}

#[test]
fn invalid_requests_never_reach_the_scheduler() {
    let (service, project_id) = seeded_service();

    let same_day = ScheduleRequest::new(d(2025, 1, 6), d(2025, 1, 6), 8);
    let err = service.generate_schedule(project_id, &same_day, 5).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Request(RequestError::InvalidRange { .. })
    ));
    assert!(err.to_string().contains("End date must be after start date"));

    let zero_hours = ScheduleRequest::new(d(2025, 1, 6), d(2025, 1, 7), 0);
    let err = service.generate_schedule(project_id, &zero_hours, 5).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Request(RequestError::DailyHoursOutOfRange(0))
    ));
}

#[test]
fn validation_runs_before_ownership_lookup() {
    let (service, _) = seeded_service();
    let request = ScheduleRequest::new(d(2025, 1, 7), d(2025, 1, 6), 8);

    let err = service.generate_schedule(999, &request, 5).unwrap_err();
    assert!(matches!(err, ServiceError::Request(_)));
}

#[test]
fn completing_tasks_through_the_store_changes_the_plan() {
    let (service, project_id) = seeded_service();
    let request = ScheduleRequest::new(d(2025, 1, 6), d(2025, 1, 7), 8);

    for task in service.store().list_tasks(project_id, 5).unwrap() {
        service.store().toggle_task(task.id, 5).unwrap();
    }

    let result = service.generate_schedule(project_id, &request, 5).unwrap();
    assert_eq!(result.total_tasks, 0);
    assert_eq!(result.warnings, vec!["No incomplete tasks to schedule".to_string()]);
}
