mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::{FailingNotifier, directory, settlement_with};
use serde_json::{Value, json};
use tipflow::application::payments::PaymentService;
use tipflow::config::PaymentConfig;
use tipflow::domain::payment::{PaymentHandle, PaymentStatus};
use tipflow::domain::ports::TipLedger;
use tipflow::domain::tip::TipId;
use tipflow::infrastructure::in_memory::{InMemoryPaymentAttemptStore, InMemoryTipLedger};
use tipflow::infrastructure::payment::SimulatedPaymentProvider;
use tipflow::interfaces::http::{AppState, router};
use tower::ServiceExt;

fn payments() -> PaymentService {
    PaymentService::new(
        Box::new(directory()),
        Box::new(SimulatedPaymentProvider::new()),
        Box::new(InMemoryPaymentAttemptStore::new()),
        PaymentConfig::default(),
    )
}

fn app(ledger: InMemoryTipLedger) -> Router {
    router(AppState::new(
        settlement_with(ledger, common::RecordingNotifier::default()),
        payments(),
    ))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_tip_success_response() {
    let ledger = InMemoryTipLedger::new();
    let (status, body) = send(
        app(ledger.clone()),
        "POST",
        "/api/tips",
        Some(json!({"creatorHandle": "alice", "amount": 5.00, "message": "love it"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Tip sent successfully!"));

    let tip_id = body["tipId"].as_str().unwrap();
    assert!(tip_id.starts_with("tip-"));
    assert!(
        ledger
            .get(&TipId::from(tip_id.to_string()))
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_tip_unknown_creator_is_404() {
    let ledger = InMemoryTipLedger::new();
    let (status, body) = send(
        app(ledger.clone()),
        "POST",
        "/api/tips",
        Some(json!({"creatorHandle": "ghost", "amount": 1.00})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Creator not found"}));
    assert!(ledger.is_empty().await);
}

#[tokio::test]
async fn test_tip_notifier_failure_still_200() {
    let app = router(AppState::new(
        settlement_with(InMemoryTipLedger::new(), FailingNotifier::default()),
        payments(),
    ));

    let (status, body) = send(
        app,
        "POST",
        "/api/tips",
        Some(json!({"creatorHandle": "alice", "amount": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Tip sent successfully!"));
}

#[tokio::test]
async fn test_tip_ledger_failure_is_500() {
    let app = router(AppState::new(
        settlement_with(common::FailingLedger, common::RecordingNotifier::default()),
        payments(),
    ));

    let (status, body) = send(
        app,
        "POST",
        "/api/tips",
        Some(json!({"creatorHandle": "alice", "amount": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_tip_bad_input_is_400() {
    let cases = [
        json!({"creatorHandle": "alice", "amount": -3}),
        json!({"creatorHandle": "alice"}),
        json!({"creatorHandle": "alice", "amount": "lots"}),
        json!({"amount": 1}),
    ];

    for case in cases {
        let (status, body) = send(
            app(InMemoryTipLedger::new()),
            "POST",
            "/api/tips",
            Some(case),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_payment_lifecycle_over_http() {
    let app = app(InMemoryTipLedger::new());

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/payments",
        Some(json!({"creatorHandle": "alice", "amount": 2.5, "tipperName": "Dana"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("pending"));
    let payment_id = body["paymentId"].as_str().unwrap().to_string();

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/payments/callback",
        Some(json!({"paymentId": payment_id, "status": "complete"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("complete"));

    let (status, body) = send(
        app.clone(),
        "GET",
        &format!("/api/payments/{payment_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("complete"));

    let (status, _) = send(
        app,
        "POST",
        "/api/payments/callback",
        Some(json!({"paymentId": payment_id, "status": "failed"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_payment_errors() {
    let app = app(InMemoryTipLedger::new());

    // carol has no payout address
    let (status, _) = send(
        app.clone(),
        "POST",
        "/api/payments",
        Some(json!({"creatorHandle": "carol", "amount": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app, "GET", "/api/payments/pay-unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Payment not found"}));
}

#[tokio::test]
async fn test_provider_status_regression_is_502() {
    let provider = SimulatedPaymentProvider::new();
    let app = router(AppState::new(
        settlement_with(InMemoryTipLedger::new(), common::RecordingNotifier::default()),
        PaymentService::new(
            Box::new(directory()),
            Box::new(provider.clone()),
            Box::new(InMemoryPaymentAttemptStore::new()),
            PaymentConfig::default(),
        ),
    ));

    let (_, body) = send(
        app.clone(),
        "POST",
        "/api/payments",
        Some(json!({"creatorHandle": "alice", "amount": 1})),
    )
    .await;
    let payment_id = body["paymentId"].as_str().unwrap().to_string();

    provider
        .set_status(&PaymentHandle::from(payment_id.clone()), PaymentStatus::Initiated)
        .await
        .unwrap();

    let (status, body) = send(app, "GET", &format!("/api/payments/{payment_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "Payment provider error"}));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(InMemoryTipLedger::new()), "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}
