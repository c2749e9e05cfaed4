use crate::http::{
    ApiError, AppState, AuthenticatedActor, Stack,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use crate::task::{
    domain::{TaskFilter, TaskId, TaskStatus},
    services::TaskDetailsRequest,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub(in crate::http) struct TaskListQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl TaskListQuery {
    fn into_filter(self) -> Result<TaskFilter, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()
            .map_err(|err| ApiError::validation(err.to_string()))?;
        Ok(TaskFilter {
            status,
            category: self.category,
        })
    }
}

pub(in crate::http) async fn list<S: Stack>(
    State(state): State<AppState<S>>,
    _: AuthenticatedActor,
    ApiQuery(query): ApiQuery<TaskListQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = query.into_filter()?;
    let tasks = state.tasks.list_tasks(&filter).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub(in crate::http) async fn create<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiJson(request): ApiJson<TaskDetailsRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let task = state.tasks.create_task(&actor, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Task created successfully", "task": task })),
    ))
}

pub(in crate::http) async fn show<S: Stack>(
    State(state): State<AppState<S>>,
    _: AuthenticatedActor,
    ApiPath(task_id): ApiPath<TaskId>,
) -> Result<Json<Value>, ApiError> {
    let task = state.tasks.get_task(task_id).await?;
    Ok(Json(json!({ "task": task })))
}

pub(in crate::http) async fn update<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(task_id): ApiPath<TaskId>,
    ApiJson(request): ApiJson<TaskDetailsRequest>,
) -> Result<Json<Value>, ApiError> {
    let task = state.tasks.update_task(&actor, task_id, request).await?;
    Ok(Json(json!({ "message": "Task updated successfully", "task": task })))
}

pub(in crate::http) async fn remove<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(task_id): ApiPath<TaskId>,
) -> Result<Json<Value>, ApiError> {
    state.tasks.delete_task(&actor, task_id).await?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
