use crate::error::ServiceError;
use crate::scheduler::{self, ScheduleRequest, ScheduleResult};
use crate::store::ProjectStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Validates schedule requests and resolves project ownership before handing
/// a snapshot to the scheduler.
pub struct SchedulerService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for SchedulerService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProjectStore + ?Sized> SchedulerService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generate_schedule(
        &self,
        project_id: i32,
        request: &ScheduleRequest,
        user_id: i32,
    ) -> Result<ScheduleResult, ServiceError> {
        request.validate()?;

        let project = self
            .store
            .get_project(project_id, user_id)?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;

        debug!(project_id, user_id, tasks = project.tasks.len(), "loaded project snapshot");
        let result = scheduler::generate_schedule(&project, request);
        info!(
            project_id,
            total = result.total_tasks,
            scheduled = result.scheduled_tasks,
            warnings = result.warnings.len(),
            "generated schedule"
        );
        Ok(result)
    }
}
