use super::AppState;
use super::error::ApiError;
use crate::domain::payment::{PaymentCallback, PaymentHandle, PaymentIntent, PaymentStatus};
use crate::domain::tip::{TipConfirmation, TipRequest};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TipResponse {
    pub success: bool,
    pub tip_id: String,
    pub message: String,
}

impl From<TipConfirmation> for TipResponse {
    fn from(confirmation: TipConfirmation) -> Self {
        Self {
            success: true,
            tip_id: confirmation.tip_id.to_string(),
            message: confirmation.message,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: String,
    pub status: PaymentStatus,
}

pub async fn create_tip(
    State(state): State<AppState>,
    payload: Result<Json<TipRequest>, JsonRejection>,
) -> Result<Json<TipResponse>, ApiError> {
    let Json(request) = payload?;
    let confirmation = state.settlement.settle_tip(request).await?;
    Ok(Json(confirmation.into()))
}

pub async fn initiate_payment(
    State(state): State<AppState>,
    payload: Result<Json<PaymentIntent>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(intent) = payload?;
    let attempt = state.payments.initiate(intent).await?;
    Ok(Json(PaymentResponse {
        payment_id: attempt.handle.to_string(),
        status: attempt.status,
    }))
}

pub async fn payment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let handle = PaymentHandle::from(id);
    let status = state.payments.status(&handle).await?;
    Ok(Json(PaymentResponse {
        payment_id: handle.to_string(),
        status,
    }))
}

pub async fn payment_callback(
    State(state): State<AppState>,
    payload: Result<Json<PaymentCallback>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(callback) = payload?;
    let payment_id = callback.payment_id.to_string();
    let status = state.payments.apply_callback(callback).await?;
    Ok(Json(PaymentResponse { payment_id, status }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
