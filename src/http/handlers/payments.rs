use crate::http::{
    ApiError, AppState, AuthenticatedActor, Stack,
    extract::{ApiJson, ApiPath},
};
use crate::payment::{
    domain::PaymentId,
    services::{PaymentRequest, PaymentSettlementRequest},
};
use crate::task::domain::TaskId;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(in crate::http) struct NewPaymentBody {
    task_id: TaskId,
    #[serde(flatten)]
    payment: PaymentRequest,
}

pub(in crate::http) async fn create<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiJson(body): ApiJson<NewPaymentBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payment = state
        .payments
        .create_payment(&actor, body.task_id, body.payment)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Payment recorded successfully", "payment": payment })),
    ))
}

pub(in crate::http) async fn update<S: Stack>(
    State(state): State<AppState<S>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(payment_id): ApiPath<PaymentId>,
    ApiJson(settlement): ApiJson<PaymentSettlementRequest>,
) -> Result<Json<Value>, ApiError> {
    let payment = state
        .payments
        .update_payment(&actor, payment_id, settlement)
        .await?;
    Ok(Json(json!({ "message": "Payment updated successfully", "payment": payment })))
}

pub(in crate::http) async fn list_for_task<S: Stack>(
    State(state): State<AppState<S>>,
    _: AuthenticatedActor,
    ApiPath(task_id): ApiPath<TaskId>,
) -> Result<Json<Value>, ApiError> {
    let payments = state.payments.list_payments_for_task(task_id).await?;
    Ok(Json(json!({ "payments": payments })))
}
