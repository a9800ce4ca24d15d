//! HTTP API integration tests.
//!
//! Spins the full router up on an ephemeral port and exercises the wire
//! contract end to end: routing, JSON shapes, status codes, and the
//! ledger semantics behind them.
//!
//! Run with: `cargo test -p eventhub-server --test http_api_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use eventhub_core::persistence::MemoryBackend;
use eventhub_core::EventHub;
use eventhub_server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_server() -> String {
    let hub = Arc::new(
        EventHub::open(Arc::new(MemoryBackend::new()))
            .await
            .expect("open store"),
    );
    let router = build_router(AppState::new(hub));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{address}")
}

fn sample_event_body(capacity: u32, price_cents: u64) -> Value {
    json!({
        "title": "Design Workshop",
        "description": "Interactive workshop on modern UI/UX design",
        "date": "2025-03-20",
        "time": "14:00:00",
        "location": "New York, NY",
        "category": "Workshop",
        "price": price_cents,
        "capacity": capacity,
        "organizer": "Design Academy"
    })
}

async fn signup(client: &reqwest::Client, base: &str, email: &str) -> Value {
    let response = client
        .post(format!("{base}/api/users/signup/"))
        .json(&json!({"email": email, "name": "Test User", "password": "hunter2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

async fn create_event(client: &reqwest::Client, base: &str, body: Value) -> Value {
    let response = client
        .post(format!("{base}/api/events/"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn reservation_lifecycle_over_http() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let user = signup(&client, &base, "ada@example.com").await;
    let event = create_event(&client, &base, sample_event_body(10, 14_900)).await;
    assert_eq!(event["registeredCount"], 0);

    // Reserve 8 of 10.
    let response = client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 8}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let reservation: Value = response.json().await.unwrap();
    assert_eq!(reservation["status"], "confirmed");
    assert_eq!(reservation["totalPrice"], 8 * 14_900);

    // Requesting 3 more than the 2 available is a capacity conflict.
    let response = client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");

    // State unchanged by the refusal.
    let fetched: Value = client
        .get(format!("{base}/api/events/{}/", event["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["registeredCount"], 8);

    // The last 2 fit exactly.
    let response = client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let second: Value = response.json().await.unwrap();

    let occupancy: Value = client
        .get(format!(
            "{base}/api/events/{}/occupancy/",
            event["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(occupancy["registeredCount"], 10);
    assert!((occupancy["occupancy"].as_f64().unwrap() - 1.0).abs() < f64::EPSILON);

    // Cancel is a status flip; the row survives.
    let response = client
        .delete(format!(
            "{base}/api/reservations/{}/",
            second["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cancelled: Value = response.json().await.unwrap();
    assert_eq!(cancelled["status"], "cancelled");
    assert!(cancelled["cancelledAt"].is_string());

    // A second cancel is an invalid-state conflict.
    let response = client
        .delete(format!(
            "{base}/api/reservations/{}/",
            second["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_STATE");

    // Full ledger keeps both rows; the per-user view shows only confirmed.
    let all: Value = client
        .get(format!("{base}/api/reservations/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let mine: Value = client
        .get(format!(
            "{base}/api/reservations/?user={}",
            user["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["ticketCount"], 8);
}

#[tokio::test]
async fn notifications_and_metrics_track_the_ledger() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let user = signup(&client, &base, "grace@example.com").await;
    let event = create_event(&client, &base, sample_event_body(100, 10_000)).await;

    let reservation: Value = client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 4}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    client
        .delete(format!(
            "{base}/api/reservations/{}/",
            reservation["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 2}))
        .send()
        .await
        .unwrap();

    // Newest first: confirmation(2), cancellation(4), confirmation(4).
    let emails: Value = client
        .get(format!("{base}/api/emails/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let emails = emails.as_array().unwrap();
    assert_eq!(emails.len(), 3);
    assert_eq!(emails[0]["type"], "confirmation");
    assert_eq!(emails[1]["type"], "cancellation");
    assert_eq!(emails[2]["type"], "confirmation");
    assert!(emails.iter().all(|email| email["to"] == "grace@example.com"));

    let cancellations: Value = client
        .get(format!("{base}/api/emails/?type=cancellation"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cancellations.as_array().unwrap().len(), 1);

    let metrics: Value = client
        .get(format!("{base}/api/metrics/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(metrics["reservations"], 1);
    assert_eq!(metrics["attendees"], 2);
    assert_eq!(metrics["revenue"], 20_000);
}

#[tokio::test]
async fn invalid_requests_map_to_the_documented_status_codes() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let user = signup(&client, &base, "ada@example.com").await;
    let event = create_event(&client, &base, sample_event_body(10, 5_000)).await;

    // Zero tickets is a validation error.
    let response = client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 0}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Unknown event id is 404.
    let response = client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({
            "user": user["id"],
            "event": uuid::Uuid::new_v4().to_string(),
            "ticketCount": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    // Duplicate signup is a validation error.
    let response = client
        .post(format!("{base}/api/users/signup/"))
        .json(&json!({"email": "ada@example.com", "name": "Ada again"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // Unknown login email is 404.
    let response = client
        .post(format!("{base}/api/users/login/"))
        .json(&json!({"email": "nobody@example.com", "password": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    // Shrinking capacity below the sold count is rejected.
    client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 6}))
        .send()
        .await
        .unwrap();
    let response = client
        .patch(format!("{base}/api/events/{}/", event["id"].as_str().unwrap()))
        .json(&json!({"capacity": 4}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn deleting_an_event_cascades_to_reservations() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let user = signup(&client, &base, "ada@example.com").await;
    let event = create_event(&client, &base, sample_event_body(10, 5_000)).await;
    client
        .post(format!("{base}/api/reservations/"))
        .json(&json!({"user": user["id"], "event": event["id"], "ticketCount": 2}))
        .send()
        .await
        .unwrap();

    let response = client
        .delete(format!("{base}/api/events/{}/", event["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let remaining: Value = client
        .get(format!("{base}/api/reservations/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(remaining.as_array().unwrap().is_empty());

    let response = client
        .get(format!("{base}/api/events/{}/", event["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
