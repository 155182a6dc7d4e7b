//! Common test utilities for integration tests.
//!
//! Integration tests need a real PostgreSQL database. They read
//! `TEST_DATABASE_URL` and skip (pass without asserting) when it is unset,
//! so the suite stays green on machines without a database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain::services::notification::MockNotifier;
use serde_json::{json, Value};
use symposium_api::app::{create_app, AppState};
use symposium_api::config::Config;
use tower::util::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub notifier: Arc<MockNotifier>,
}

/// Build a full application against the test database, with a mock notifier
/// capturing outbound email. Returns None when TEST_DATABASE_URL is unset.
pub async fn setup() -> Option<TestApp> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping integration test");
        return None;
    };

    let config = Config::load_for_test(&[("database.url", url.as_str())])
        .expect("Failed to build test config");

    let pool = persistence::db::create_pool(&config.database.pool_settings())
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let notifier = Arc::new(MockNotifier::new());
    let state = AppState::build_with_notifier(config, pool, Arc::clone(&notifier) as _);

    Some(TestApp {
        router: create_app(state.clone()),
        state,
        notifier,
    })
}

pub const TEST_ADMIN_KEY: &str = "test-admin-key";

/// Fire one request at the router and decode the JSON response body.
pub async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    admin_key: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = admin_key {
        builder = builder.header("X-Admin-Key", key);
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request build failed"),
        None => builder.body(Body::empty()).expect("request build failed"),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Random 12-digit register number, unique enough for parallel tests.
pub fn unique_reg_no() -> String {
    format!("{:012}", rand::random::<u64>() % 1_000_000_000_000)
}

pub fn unique_email() -> String {
    format!("student{}@example.com", rand::random::<u32>())
}

pub fn unique_event_name(prefix: &str) -> String {
    format!("{} {}", prefix, rand::random::<u32>())
}

/// Valid registration body with the given identity and event selections.
pub fn register_body(email: &str, reg_no: &str, events: Vec<Value>) -> Value {
    json!({
        "name": "Priya Sharma",
        "regNo": reg_no,
        "college": "Anna University",
        "department": "Computer Science",
        "year": 3,
        "email": email,
        "phone": "9876543210",
        "events": events,
    })
}

/// Create an event through the admin API and return its id.
pub async fn create_event(router: &Router, name: &str, max_team_size: i32) -> i64 {
    let (status, body) = send_json(
        router,
        "POST",
        "/api/v1/admin/events",
        Some(json!({
            "eventName": name,
            "eventType": if max_team_size > 1 { "team" } else { "solo" },
            "maxTeamSize": max_team_size,
        })),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", body);
    body["id"].as_i64().expect("event id missing")
}

/// Pull the 6-digit code out of the most recent captured email.
pub fn last_otp_code(notifier: &MockNotifier) -> Option<String> {
    let sent = notifier.sent();
    let html = &sent.last()?.html_body;

    let mut run = String::new();
    for c in html.chars() {
        if c.is_ascii_digit() {
            run.push(c);
            if run.len() == 6 {
                return Some(run);
            }
        } else {
            run.clear();
        }
    }
    None
}
