pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod project;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod task;
pub mod telemetry;

pub use calendar::WorkCalendar;
pub use config::{ConfigError, ServerConfig};
pub use error::{ExportError, RequestError, ServiceError, StoreError};
pub use export::{
    load_project_from_json, load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
pub use project::{NewProject, Project, ProjectSummary, ProjectUpdate};
pub use scheduler::{Priority, ScheduleRequest, ScheduleResult, ScheduledTask, generate_schedule};
pub use service::SchedulerService;
#[cfg(feature = "sqlite")]
pub use store::SqliteProjectStore;
pub use store::{MemoryProjectStore, ProjectStore};
pub use task::{NewTask, Task, TaskUpdate};
