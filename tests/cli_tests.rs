use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use tempfile::NamedTempFile;

const PROJECT_JSON: &str = r#"{
    "id": 4,
    "ownerId": 1,
    "title": "CLI Project",
    "createdAt": "2025-01-01T08:00:00Z",
    "tasks": [
        {"id": 1, "title": "Draft", "projectId": 4, "createdAt": "2025-01-01T08:01:00Z"},
        {"id": 2, "title": "Polish", "projectId": 4, "createdAt": "2025-01-01T08:02:00Z", "dueDate": "2025-01-07"},
        {"id": 3, "title": "Done", "projectId": 4, "createdAt": "2025-01-01T08:03:00Z", "isCompleted": true}
    ]
}"#;

fn project_file() -> NamedTempFile {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(tmp.path(), PROJECT_JSON).expect("write project");
    tmp
}

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("cli").expect("cli binary")
}

#[test]
fn cli_prints_schedule_table() {
    let project = project_file();
    cli()
        .arg(project.path())
        .args(["2025-01-06", "2025-01-07", "8"])
        .assert()
        .success()
        .stdout(str_contains("CLI Project"))
        .stdout(str_contains("Due date: 2025-01-07"))
        .stdout(str_contains("Scheduled based on creation order"))
        .stdout(str_contains("tasks=2, scheduled=2"));
}

#[test]
fn cli_marks_priority_tasks() {
    let project = project_file();
    cli()
        .arg(project.path())
        .args(["2025-01-06", "2025-01-07", "8", "1"])
        .assert()
        .success()
        .stdout(str_contains("User marked as priority"));
}

#[test]
fn cli_reports_invalid_range() {
    let project = project_file();
    cli()
        .arg(project.path())
        .args(["2025-01-07", "2025-01-06"])
        .assert()
        .code(2)
        .stderr(str_contains("End date must be after start date"));
}

#[test]
fn cli_reports_shortage_warning() {
    let project = project_file();
    cli()
        .arg(project.path())
        .args(["2025-01-04", "2025-01-05"])
        .assert()
        .success()
        .stdout(str_contains(
            "Warning: Not enough time to schedule all tasks. 2 tasks remain unscheduled.",
        ));
}

#[test]
fn cli_writes_json_output() {
    let project = project_file();
    let out = NamedTempFile::new().expect("create temp file");
    cli()
        .arg(project.path())
        .args(["2025-01-06", "2025-01-07", "8"])
        .arg("--json")
        .arg(out.path())
        .assert()
        .success()
        .stdout(str_contains("Schedule written to"));

    let result: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path()).unwrap()).unwrap();
    assert_eq!(result["scheduledTasks"], 2);
    assert_eq!(result["schedule"][0]["taskId"], 2);
}

#[test]
fn cli_requires_positional_arguments() {
    cli()
        .arg("only-one.json")
        .assert()
        .code(2)
        .stderr(str_contains("Usage:"));
}
