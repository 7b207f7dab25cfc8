//! Ownership-checked persistence for projects and tasks.
//!
//! Every lookup is scoped to an owner: a project or task belonging to another
//! user behaves exactly like a missing one.

use crate::error::StoreResult;
use crate::project::{NewProject, Project, ProjectSummary, ProjectUpdate};
use crate::task::{NewTask, Task, TaskUpdate};

pub trait ProjectStore: Send + Sync {
    fn create_project(&self, owner_id: i32, project: NewProject) -> StoreResult<Project>;

    /// Owner's projects, newest first.
    fn list_projects(&self, owner_id: i32) -> StoreResult<Vec<ProjectSummary>>;

    /// Project with its tasks ordered by creation time.
    fn get_project(&self, project_id: i32, owner_id: i32) -> StoreResult<Option<Project>>;

    fn update_project(
        &self,
        project_id: i32,
        owner_id: i32,
        update: ProjectUpdate,
    ) -> StoreResult<Option<ProjectSummary>>;

    /// Removes the project and all of its tasks.
    fn delete_project(&self, project_id: i32, owner_id: i32) -> StoreResult<bool>;

    /// Empty when the project does not exist or is not owned by `owner_id`.
    fn list_tasks(&self, project_id: i32, owner_id: i32) -> StoreResult<Vec<Task>>;

    fn get_task(&self, task_id: i32, owner_id: i32) -> StoreResult<Option<Task>>;

    /// `None` when the target project is not owned by `owner_id`.
    fn create_task(&self, owner_id: i32, task: NewTask) -> StoreResult<Option<Task>>;

    fn update_task(&self, task_id: i32, owner_id: i32, update: TaskUpdate)
    -> StoreResult<Option<Task>>;

    fn toggle_task(&self, task_id: i32, owner_id: i32) -> StoreResult<Option<Task>>;

    fn delete_task(&self, task_id: i32, owner_id: i32) -> StoreResult<bool>;

    fn owns_project(&self, project_id: i32, owner_id: i32) -> StoreResult<bool> {
        Ok(self.get_project(project_id, owner_id)?.is_some())
    }
}

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryProjectStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteProjectStore;
