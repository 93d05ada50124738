//! Request handlers.

use crate::auth::Requester;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    Extension, Form, Json,
    extract::{
        Query, State,
        rejection::{FormRejection, JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tasktrack_core::{IssuedToken, Registration, TaskDraft, TaskGroups, TaskId, TrackerError};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Password-grant form (`application/x-www-form-urlencoded`).
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub grant_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarkDoneRequest {
    pub id: TaskId,
}

pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "tasktrack-server" }))
}

/// `POST /reg`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Registration>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(reg) = body?;
    let status = state.service.register(reg).await?;
    Ok(Json(StatusResponse { status }))
}

/// `POST /token` (path configurable)
pub async fn token(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> Result<Json<IssuedToken>, ApiError> {
    let Form(form) = form?;
    if let Some(grant) = form.grant_type.as_deref()
        && grant != "password"
    {
        return Err(TrackerError::Validation(format!("unsupported grant_type '{grant}'")).into());
    }
    let issued = state
        .service
        .issue_token(&form.username, &form.password)
        .await?;
    tracing::info!(login = %issued.username, "token issued");
    Ok(Json(issued))
}

/// `POST /add_task`
pub async fn add_task(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    body: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(draft) = body?;
    let id = state.service.add_task(requester.user_id, draft).await?;
    Ok(Json(MessageResponse {
        message: format!("Task added! Task id: {id}"),
    }))
}

/// `GET /tasks?tag=`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    query: Result<Query<TasksQuery>, QueryRejection>,
) -> Result<Json<TaskGroups>, ApiError> {
    let Query(query) = query?;
    let groups = state
        .service
        .list_tasks(requester.user_id, query.tag.as_deref())
        .await?;
    Ok(Json(groups))
}

/// `PUT /mark_done`
pub async fn mark_done(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    body: Result<Json<MarkDoneRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = body?;
    let text = state.service.mark_done(requester.user_id, req.id).await?;
    Ok(Json(MessageResponse {
        message: format!("Task [{text}] marked as done"),
    }))
}
