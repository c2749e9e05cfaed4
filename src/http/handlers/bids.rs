use crate::bid::{domain::BidId, services::BidTermsRequest};
use crate::http::{
    ApiError, AppState, AuthenticatedActor, Stack,
    extract::{ApiJson, ApiPath},
};
use crate::task::domain::TaskId;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(in crate::http) struct NewBidBody {
    task_id: TaskId,
    #[serde(flatten)]
    terms: BidTermsRequest,
}

pub(in crate::http) async fn create<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiJson(body): ApiJson<NewBidBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let bid = state.bids.create_bid(&actor, body.task_id, body.terms).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Bid submitted successfully", "bid": bid })),
    ))
}

pub(in crate::http) async fn update<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(bid_id): ApiPath<BidId>,
    ApiJson(terms): ApiJson<BidTermsRequest>,
) -> Result<Json<Value>, ApiError> {
    let bid = state.bids.update_bid(&actor, bid_id, terms).await?;
    Ok(Json(json!({ "message": "Bid updated successfully", "bid": bid })))
}

pub(in crate::http) async fn accept<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(bid_id): ApiPath<BidId>,
) -> Result<Json<Value>, ApiError> {
    let acceptance = state.bids.accept_bid(&actor, bid_id).await?;
    Ok(Json(json!({
        "message": "Bid accepted successfully",
        "bid": acceptance.bid,
        "task": acceptance.task,
    })))
}

pub(in crate::http) async fn list_for_task<S: Stack>(
    State(state): State<AppState<S>>,
    _: AuthenticatedActor,
    ApiPath(task_id): ApiPath<TaskId>,
) -> Result<Json<Value>, ApiError> {
    let bids = state.bids.list_bids_for_task(task_id).await?;
    Ok(Json(json!({ "bids": bids })))
}
