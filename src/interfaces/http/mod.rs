//! HTTP API.
//!
//! - `POST /api/tips` - settle a tip
//! - `POST /api/payments` - start a wallet payment
//! - `GET /api/payments/{id}` - payment status
//! - `POST /api/payments/callback` - provider completion signal
//! - `GET /api/health` - liveness

pub mod error;
pub mod handlers;

use crate::application::payments::PaymentService;
use crate::application::settlement::TipSettlement;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub settlement: Arc<TipSettlement>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(settlement: TipSettlement, payments: PaymentService) -> Self {
        Self {
            settlement: Arc::new(settlement),
            payments: Arc::new(payments),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tips", post(handlers::create_tip))
        .route("/api/payments", post(handlers::initiate_payment))
        .route("/api/payments/callback", post(handlers::payment_callback))
        .route("/api/payments/{id}", get(handlers::payment_status))
        .route("/api/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
