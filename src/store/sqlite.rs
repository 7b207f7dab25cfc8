use super::ProjectStore;
use crate::error::{StoreError, StoreResult};
use crate::project::{NewProject, Project, ProjectSummary, ProjectUpdate};
use crate::task::{NewTask, Task, TaskUpdate};
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

const TASK_COLUMNS: &str = "t.id, t.project_id, t.title, t.due_date, t.is_completed, t.created_at";

pub struct SqliteProjectStore {
    connection: Mutex<Connection>,
}

struct ProjectRow {
    id: i32,
    owner_id: i32,
    title: String,
    description: Option<String>,
    created_at: String,
}

impl ProjectRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_project(self) -> StoreResult<Project> {
        let created_at = parse_timestamp(&self.created_at)?;
        let mut project = Project::new(self.id, self.owner_id, self.title, created_at);
        project.description = self.description;
        Ok(project)
    }
}

struct TaskRow {
    id: i32,
    project_id: i32,
    title: String,
    due_date: Option<String>,
    is_completed: bool,
    created_at: String,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            title: row.get(2)?,
            due_date: row.get(3)?,
            is_completed: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_task(self) -> StoreResult<Task> {
        let due_date = self
            .due_date
            .as_deref()
            .map(|raw| {
                raw.parse::<NaiveDate>().map_err(|err| {
                    StoreError::InvalidData(format!("task {} due_date '{raw}': {err}", self.id))
                })
            })
            .transpose()?;
        Ok(Task {
            id: self.id,
            title: self.title,
            due_date,
            is_completed: self.is_completed,
            created_at: parse_timestamp(&self.created_at)?,
            project_id: self.project_id,
        })
    }
}

// Fixed-width so that lexical order in SQL matches chronological order.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| StoreError::InvalidData(format!("timestamp '{raw}': {err}")))
}

fn row_id(id: i64) -> StoreResult<i32> {
    i32::try_from(id).map_err(|_| StoreError::InvalidData(format!("row id {id} out of range")))
}

impl SqliteProjectStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> StoreResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> StoreResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                due_date TEXT,
                is_completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_projects_owner ON projects(owner_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn load_project(
        conn: &Connection,
        project_id: i32,
        owner_id: i32,
    ) -> StoreResult<Option<Project>> {
        let row = conn
            .query_row(
                "SELECT id, owner_id, title, description, created_at FROM projects
                 WHERE id = ?1 AND owner_id = ?2",
                params![project_id, owner_id],
                ProjectRow::from_row,
            )
            .optional()?;
        row.map(ProjectRow::into_project).transpose()
    }

    fn load_tasks(conn: &Connection, project_id: i32) -> StoreResult<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t WHERE t.project_id = ?1 ORDER BY t.created_at, t.id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![project_id], TaskRow::from_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.into_task()?);
        }
        Ok(tasks)
    }

    fn load_owned_task(
        conn: &Connection,
        task_id: i32,
        owner_id: i32,
    ) -> StoreResult<Option<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t JOIN projects p ON p.id = t.project_id
             WHERE t.id = ?1 AND p.owner_id = ?2"
        );
        let row = conn
            .query_row(&sql, params![task_id, owner_id], TaskRow::from_row)
            .optional()?;
        row.map(TaskRow::into_task).transpose()
    }

    fn load_summary(
        conn: &Connection,
        project_id: i32,
        owner_id: i32,
    ) -> StoreResult<Option<ProjectSummary>> {
        let Some(project) = Self::load_project(conn, project_id, owner_id)? else {
            return Ok(None);
        };
        let tasks = Self::load_tasks(conn, project_id)?;
        Ok(Some(project.with_tasks(tasks).summary()))
    }
}

impl ProjectStore for SqliteProjectStore {
    fn create_project(&self, owner_id: i32, project: NewProject) -> StoreResult<Project> {
        let conn = self.connection.lock();
        let created_at = Utc::now().trunc_subsecs(6);
        conn.execute(
            "INSERT INTO projects (owner_id, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![owner_id, project.title, project.description, format_timestamp(created_at)],
        )?;
        let id = row_id(conn.last_insert_rowid())?;
        info!(project_id = id, owner_id, "created project");
        let mut created = Project::new(id, owner_id, project.title, created_at);
        created.description = project.description;
        Ok(created)
    }

    fn list_projects(&self, owner_id: i32) -> StoreResult<Vec<ProjectSummary>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.title, p.description, p.created_at,
                    COUNT(t.id), COALESCE(SUM(t.is_completed), 0)
             FROM projects p LEFT JOIN tasks t ON t.project_id = p.id
             WHERE p.owner_id = ?1
             GROUP BY p.id
             ORDER BY p.created_at DESC, p.id DESC",
        )?;
        let rows = stmt.query_map(params![owner_id], |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, title, description, created_at, task_count, completed) = row?;
            summaries.push(ProjectSummary {
                id,
                title,
                description,
                created_at: parse_timestamp(&created_at)?,
                task_count: task_count.max(0) as usize,
                completed_task_count: completed.max(0) as usize,
            });
        }
        Ok(summaries)
    }

    fn get_project(&self, project_id: i32, owner_id: i32) -> StoreResult<Option<Project>> {
        let conn = self.connection.lock();
        let Some(project) = Self::load_project(&conn, project_id, owner_id)? else {
            return Ok(None);
        };
        let tasks = Self::load_tasks(&conn, project_id)?;
        Ok(Some(project.with_tasks(tasks)))
    }

    fn update_project(
        &self,
        project_id: i32,
        owner_id: i32,
        update: ProjectUpdate,
    ) -> StoreResult<Option<ProjectSummary>> {
        let conn = self.connection.lock();
        let changed = conn.execute(
            "UPDATE projects SET title = ?1, description = ?2 WHERE id = ?3 AND owner_id = ?4",
            params![update.title, update.description, project_id, owner_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::load_summary(&conn, project_id, owner_id)
    }

    fn delete_project(&self, project_id: i32, owner_id: i32) -> StoreResult<bool> {
        let conn = self.connection.lock();
        let removed = conn.execute(
            "DELETE FROM projects WHERE id = ?1 AND owner_id = ?2",
            params![project_id, owner_id],
        )?;
        if removed > 0 {
            info!(project_id, owner_id, "deleted project");
        }
        Ok(removed > 0)
    }

    fn list_tasks(&self, project_id: i32, owner_id: i32) -> StoreResult<Vec<Task>> {
        let conn = self.connection.lock();
        if Self::load_project(&conn, project_id, owner_id)?.is_none() {
            return Ok(Vec::new());
        }
        Self::load_tasks(&conn, project_id)
    }

    fn get_task(&self, task_id: i32, owner_id: i32) -> StoreResult<Option<Task>> {
        let conn = self.connection.lock();
        Self::load_owned_task(&conn, task_id, owner_id)
    }

    fn create_task(&self, owner_id: i32, task: NewTask) -> StoreResult<Option<Task>> {
        let conn = self.connection.lock();
        if Self::load_project(&conn, task.project_id, owner_id)?.is_none() {
            return Ok(None);
        }
        let created_at = Utc::now().trunc_subsecs(6);
        conn.execute(
            "INSERT INTO tasks (project_id, title, due_date, is_completed, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![
                task.project_id,
                task.title,
                task.due_date.map(|due| due.to_string()),
                format_timestamp(created_at)
            ],
        )?;
        let id = row_id(conn.last_insert_rowid())?;
        info!(task_id = id, project_id = task.project_id, "created task");
        let mut created = Task::new(id, task.project_id, task.title, created_at);
        created.due_date = task.due_date;
        Ok(Some(created))
    }

    fn update_task(
        &self,
        task_id: i32,
        owner_id: i32,
        update: TaskUpdate,
    ) -> StoreResult<Option<Task>> {
        let conn = self.connection.lock();
        let Some(mut task) = Self::load_owned_task(&conn, task_id, owner_id)? else {
            return Ok(None);
        };
        update.apply_to(&mut task);
        conn.execute(
            "UPDATE tasks SET title = ?1, due_date = ?2, is_completed = ?3 WHERE id = ?4",
            params![
                task.title,
                task.due_date.map(|due| due.to_string()),
                task.is_completed,
                task.id
            ],
        )?;
        Ok(Some(task))
    }

    fn toggle_task(&self, task_id: i32, owner_id: i32) -> StoreResult<Option<Task>> {
        let conn = self.connection.lock();
        let Some(mut task) = Self::load_owned_task(&conn, task_id, owner_id)? else {
            return Ok(None);
        };
        task.is_completed = !task.is_completed;
        conn.execute(
            "UPDATE tasks SET is_completed = ?1 WHERE id = ?2",
            params![task.is_completed, task.id],
        )?;
        Ok(Some(task))
    }

    fn delete_task(&self, task_id: i32, owner_id: i32) -> StoreResult<bool> {
        let conn = self.connection.lock();
        if Self::load_owned_task(&conn, task_id, owner_id)?.is_none() {
            return Ok(false);
        }
        conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
        info!(task_id, owner_id, "deleted task");
        Ok(true)
    }
}
