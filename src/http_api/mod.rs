use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{error, info};

use crate::{
    NewProject, NewTask, Project, ProjectStore, ProjectSummary, ProjectUpdate, ScheduleRequest,
    ScheduleResult, SchedulerService, ServiceError, StoreError, Task, TaskUpdate,
};

/// Header carrying the authenticated caller id, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    scheduler: SchedulerService<dyn ProjectStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            scheduler: SchedulerService::new(store),
        }
    }

    fn store(&self) -> &dyn ProjectStore {
        self.scheduler.store()
    }
}

/// Authenticated caller extracted from [`USER_ID_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .map(Caller)
            .ok_or_else(|| ApiError::Unauthorized("missing or invalid caller identity".into()))
    }
}

/// JSON body extractor whose parse failures render as [`ApiError::Invalid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Invalid(String),
    Unauthorized(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        error!(error = %value, "store failure");
        ApiError::Internal(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Request(err) => ApiError::Invalid(err.to_string()),
            ServiceError::ProjectNotFound(_) => ApiError::not_found("Project not found"),
            ServiceError::Store(err) => ApiError::from(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, "unauthorized", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/:id/tasks", get(list_project_tasks))
        .route("/projects/:id/scheduler/schedule", post(generate_schedule))
        .route("/tasks", post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/toggle", patch(toggle_task))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, store: Arc<dyn ProjectStore>) -> std::io::Result<()> {
    let app = router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "task-planner HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_projects(
    State(state): State<AppState>,
    Caller(user_id): Caller,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    Ok(Json(state.store().list_projects(user_id)?))
}

async fn create_project(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    ApiJson(payload): ApiJson<NewProject>,
) -> Result<(StatusCode, Json<ProjectSummary>), ApiError> {
    let created = state.store().create_project(user_id, payload)?;
    Ok((StatusCode::CREATED, Json(created.summary())))
}

async fn get_project(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(project_id): Path<i32>,
) -> Result<Json<Project>, ApiError> {
    state
        .store()
        .get_project(project_id, user_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("project {project_id} not found")))
}

async fn update_project(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(project_id): Path<i32>,
    ApiJson(payload): ApiJson<ProjectUpdate>,
) -> Result<Json<ProjectSummary>, ApiError> {
    state
        .store()
        .update_project(project_id, user_id, payload)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("project {project_id} not found")))
}

async fn delete_project(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(project_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.store().delete_project(project_id, user_id)? {
        return Err(ApiError::not_found(format!("project {project_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_project_tasks(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store().list_tasks(project_id, user_id)?))
}

async fn create_task(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    ApiJson(payload): ApiJson<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let project_id = payload.project_id;
    match state.store().create_task(user_id, payload)? {
        Some(task) => Ok((StatusCode::CREATED, Json(task))),
        None => Err(ApiError::not_found(format!("project {project_id} not found"))),
    }
}

async fn get_task(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    state
        .store()
        .get_task(task_id, user_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

async fn update_task(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(task_id): Path<i32>,
    ApiJson(payload): ApiJson<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    state
        .store()
        .update_task(task_id, user_id, payload)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

async fn toggle_task(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    state
        .store()
        .toggle_task(task_id, user_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

async fn delete_task(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(task_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.store().delete_task(task_id, user_id)? {
        return Err(ApiError::not_found(format!("task {task_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn generate_schedule(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(project_id): Path<i32>,
    ApiJson(request): ApiJson<ScheduleRequest>,
) -> Result<Json<ScheduleResult>, ApiError> {
    let result = state
        .scheduler
        .generate_schedule(project_id, &request, user_id)?;
    Ok(Json(result))
}
