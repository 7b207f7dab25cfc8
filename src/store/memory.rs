use super::ProjectStore;
use crate::error::StoreResult;
use crate::project::{NewProject, Project, ProjectSummary, ProjectUpdate};
use crate::task::{NewTask, Task, TaskUpdate};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Default)]
struct State {
    projects: BTreeMap<i32, Project>,
    tasks: BTreeMap<i32, Task>,
    last_project_id: i32,
    last_task_id: i32,
}

impl State {
    fn owned_project(&self, project_id: i32, owner_id: i32) -> Option<&Project> {
        self.projects
            .get(&project_id)
            .filter(|project| project.owner_id == owner_id)
    }

    fn owns_task(&self, task: &Task, owner_id: i32) -> bool {
        self.owned_project(task.project_id, owner_id).is_some()
    }

    fn tasks_for(&self, project_id: i32) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at, task.id));
        tasks
    }

    fn snapshot(&self, project: &Project) -> Project {
        project.clone().with_tasks(self.tasks_for(project.id))
    }
}

/// Store backed by process memory. Ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    state: RwLock<State>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a complete snapshot, keeping its ids and timestamps.
    pub fn insert_snapshot(&self, project: Project) {
        let mut state = self.state.write();
        state.last_project_id = state.last_project_id.max(project.id);
        for task in &project.tasks {
            state.last_task_id = state.last_task_id.max(task.id);
            let mut task = task.clone();
            task.project_id = project.id;
            state.tasks.insert(task.id, task);
        }
        state.projects.insert(project.id, project.with_tasks(Vec::new()));
    }
}

impl ProjectStore for MemoryProjectStore {
    fn create_project(&self, owner_id: i32, project: NewProject) -> StoreResult<Project> {
        let mut state = self.state.write();
        state.last_project_id += 1;
        let mut created = Project::new(state.last_project_id, owner_id, project.title, Utc::now());
        created.description = project.description;
        state.projects.insert(created.id, created.clone());
        info!(project_id = created.id, owner_id, "created project");
        Ok(created)
    }

    fn list_projects(&self, owner_id: i32) -> StoreResult<Vec<ProjectSummary>> {
        let state = self.state.read();
        let mut projects: Vec<&Project> = state
            .projects
            .values()
            .filter(|project| project.owner_id == owner_id)
            .collect();
        projects.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(projects
            .into_iter()
            .map(|project| state.snapshot(project).summary())
            .collect())
    }

    fn get_project(&self, project_id: i32, owner_id: i32) -> StoreResult<Option<Project>> {
        let state = self.state.read();
        Ok(state
            .owned_project(project_id, owner_id)
            .map(|project| state.snapshot(project)))
    }

    fn update_project(
        &self,
        project_id: i32,
        owner_id: i32,
        update: ProjectUpdate,
    ) -> StoreResult<Option<ProjectSummary>> {
        let mut state = self.state.write();
        if state.owned_project(project_id, owner_id).is_none() {
            return Ok(None);
        }
        if let Some(project) = state.projects.get_mut(&project_id) {
            project.title = update.title;
            project.description = update.description;
        }
        Ok(state
            .projects
            .get(&project_id)
            .map(|project| state.snapshot(project).summary()))
    }

    fn delete_project(&self, project_id: i32, owner_id: i32) -> StoreResult<bool> {
        let mut state = self.state.write();
        if state.owned_project(project_id, owner_id).is_none() {
            return Ok(false);
        }
        state.projects.remove(&project_id);
        state.tasks.retain(|_, task| task.project_id != project_id);
        info!(project_id, owner_id, "deleted project");
        Ok(true)
    }

    fn list_tasks(&self, project_id: i32, owner_id: i32) -> StoreResult<Vec<Task>> {
        let state = self.state.read();
        if state.owned_project(project_id, owner_id).is_none() {
            return Ok(Vec::new());
        }
        Ok(state.tasks_for(project_id))
    }

    fn get_task(&self, task_id: i32, owner_id: i32) -> StoreResult<Option<Task>> {
        let state = self.state.read();
        Ok(state
            .tasks
            .get(&task_id)
            .filter(|task| state.owns_task(task, owner_id))
            .cloned())
    }

    fn create_task(&self, owner_id: i32, task: NewTask) -> StoreResult<Option<Task>> {
        let mut state = self.state.write();
        if state.owned_project(task.project_id, owner_id).is_none() {
            return Ok(None);
        }
        state.last_task_id += 1;
        let mut created = Task::new(state.last_task_id, task.project_id, task.title, Utc::now());
        created.due_date = task.due_date;
        state.tasks.insert(created.id, created.clone());
        info!(task_id = created.id, project_id = created.project_id, "created task");
        Ok(Some(created))
    }

    fn update_task(
        &self,
        task_id: i32,
        owner_id: i32,
        update: TaskUpdate,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write();
        let owned = state
            .tasks
            .get(&task_id)
            .is_some_and(|task| state.owns_task(task, owner_id));
        if !owned {
            return Ok(None);
        }
        Ok(state.tasks.get_mut(&task_id).map(|task| {
            update.apply_to(task);
            task.clone()
        }))
    }

    fn toggle_task(&self, task_id: i32, owner_id: i32) -> StoreResult<Option<Task>> {
        let mut state = self.state.write();
        let owned = state
            .tasks
            .get(&task_id)
            .is_some_and(|task| state.owns_task(task, owner_id));
        if !owned {
            return Ok(None);
        }
        Ok(state.tasks.get_mut(&task_id).map(|task| {
            task.is_completed = !task.is_completed;
            task.clone()
        }))
    }

    fn delete_task(&self, task_id: i32, owner_id: i32) -> StoreResult<bool> {
        let mut state = self.state.write();
        let owned = state
            .tasks
            .get(&task_id)
            .is_some_and(|task| state.owns_task(task, owner_id));
        if owned {
            state.tasks.remove(&task_id);
            info!(task_id, owner_id, "deleted task");
        }
        Ok(owned)
    }
}
