use crate::http::{
    ApiError, AppState, AuthenticatedActor, Stack,
    extract::{ApiJson, ApiPath},
};
use crate::identity::domain::UserId;
use crate::review::services::ReviewRequest;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

pub(in crate::http) async fn create<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let recorded = state.reviews.create_review(&actor, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review submitted successfully",
            "review": recorded.review,
            "rating": recorded.rating,
        })),
    ))
}

pub(in crate::http) async fn list_for_user<S: Stack>(
    State(state): State<AppState<S>>,
    _: AuthenticatedActor,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Value>, ApiError> {
    let reviews = state.reviews.list_reviews_for_user(user_id).await?;
    Ok(Json(json!({ "reviews": reviews })))
}
