use crate::http::{
    ApiError, AppState, AuthenticatedActor, Stack,
    extract::{ApiJson, ApiPath},
};
use crate::identity::domain::{ProfileUpdate, UserId};
use axum::{Json, extract::State};
use serde_json::{Value, json};

pub(in crate::http) async fn me<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.current_user(&actor).await?;
    Ok(Json(json!({ "user": user })))
}

pub(in crate::http) async fn update_me<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.update_profile(&actor, update).await?;
    Ok(Json(json!({ "message": "Profile updated successfully", "user": user })))
}

pub(in crate::http) async fn show<S: Stack>(
    State(state): State<AppState<S>>,
    _: AuthenticatedActor,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.find_user(user_id).await?;
    Ok(Json(json!({ "user": user })))
}
