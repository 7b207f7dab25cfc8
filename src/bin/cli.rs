use chrono::NaiveDate;
use std::env;
use std::process::ExitCode;
use task_planner::{
    ScheduleRequest, ScheduleResult, WorkCalendar, generate_schedule, load_project_from_json,
    save_schedule_to_csv, save_schedule_to_json, scheduler::DEFAULT_DAILY_WORK_HOURS, telemetry,
};

const USAGE: &str = "Usage: cli <project.json> <start YYYY-MM-DD> <end YYYY-MM-DD> \
[daily_hours] [priority_ids_csv] [--json <path> | --csv <path>]";

enum Output {
    Table,
    Json(String),
    Csv(String),
}

struct Args {
    project_path: String,
    request: ScheduleRequest,
    output: Output,
}

fn parse_id_list(s: &str) -> Vec<i32> {
    s.split(',')
        .filter_map(|p| p.trim().parse::<i32>().ok())
        .collect()
}

fn parse_date(label: &str, raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("Invalid {label} date '{raw}', expected YYYY-MM-DD."))
}

fn parse_args(raw: Vec<String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut output = Output::Table;
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" | "--csv" => {
                let path = iter
                    .next()
                    .ok_or_else(|| format!("{arg} requires a path."))?;
                output = if arg == "--json" {
                    Output::Json(path)
                } else {
                    Output::Csv(path)
                };
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() < 3 {
        return Err(USAGE.to_string());
    }
    let start = parse_date("start", &positional[1])?;
    let end = parse_date("end", &positional[2])?;
    let daily_hours = match positional.get(3) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| format!("Invalid daily hours '{raw}'."))?,
        None => DEFAULT_DAILY_WORK_HOURS,
    };
    let mut request = ScheduleRequest::new(start, end, daily_hours);
    if let Some(raw) = positional.get(4) {
        request = request.with_priority_tasks(parse_id_list(raw));
    }

    Ok(Args {
        project_path: positional.swap_remove(0),
        request,
        output,
    })
}

fn render_schedule_as_text_table(result: &ScheduleResult) -> String {
    let headers = ["task_id", "title", "date", "hours", "priority", "reason"];
    let rows: Vec<[String; 6]> = result
        .schedule
        .iter()
        .map(|entry| {
            [
                entry.task_id.to_string(),
                entry.title.clone(),
                entry.scheduled_date.to_string(),
                entry.estimated_hours.to_string(),
                entry.priority.to_string(),
                entry.reason.clone(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[&str]| {
        let mut line = String::from("|");
        for (i, cell) in cells.iter().enumerate() {
            let pad = widths[i].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&headers[..]));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_result(result: &ScheduleResult, request: &ScheduleRequest) {
    let work_days =
        WorkCalendar::default().count_available_days(request.start_date, request.end_date);
    println!(
        "Project {} ({}): {} to {}, {} work days",
        result.project_id, result.project_title, result.start_date, result.end_date, work_days
    );
    print!("{}", render_schedule_as_text_table(result));
    println!("{}", result.to_cli_summary());
    if result.unscheduled_tasks() > 0 {
        println!("Unscheduled tasks: {}", result.unscheduled_tasks());
    }
    for warning in &result.warnings {
        println!("Warning: {warning}");
    }
}

fn main() -> ExitCode {
    telemetry::init_tracing();

    let args = match parse_args(env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = args.request.validate() {
        eprintln!("Invalid schedule request: {err}");
        return ExitCode::from(2);
    }

    let project = match load_project_from_json(&args.project_path) {
        Ok(project) => project,
        Err(err) => {
            eprintln!("Failed to load project from {}: {err}", args.project_path);
            return ExitCode::FAILURE;
        }
    };

    let result = generate_schedule(&project, &args.request);
    let written = match &args.output {
        Output::Table => {
            print_result(&result, &args.request);
            return ExitCode::SUCCESS;
        }
        Output::Json(path) => save_schedule_to_json(&result, path).map(|_| path),
        Output::Csv(path) => save_schedule_to_csv(&result, path).map(|_| path),
    };

    match written {
        Ok(path) => {
            println!("Schedule written to {path} ({})", result.to_cli_summary());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to write schedule: {err}");
            ExitCode::FAILURE
        }
    }
}
