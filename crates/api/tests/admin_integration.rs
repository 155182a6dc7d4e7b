//! Admin surface tests: key enforcement, event management, settings.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::{
    create_event, register_body, send_json, setup, unique_email, unique_event_name,
    unique_reg_no, TEST_ADMIN_KEY,
};

#[tokio::test]
async fn test_admin_routes_require_key() {
    let Some(app) = setup().await else { return };
    let body = json!({"eventName": unique_event_name("Gated"), "eventType": "solo", "maxTeamSize": 1});

    let (status, response) = send_json(
        &app.router,
        "POST",
        "/api/v1/admin/events",
        Some(body.clone()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], json!("Missing X-Admin-Key header"));

    let (status, response) = send_json(
        &app.router,
        "POST",
        "/api/v1/admin/events",
        Some(body.clone()),
        Some("wrong-key"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], json!("Invalid admin key"));

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/v1/admin/events",
        Some(body),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_event_rejects_duplicate_name() {
    let Some(app) = setup().await else { return };
    let event = unique_event_name("Debate");
    create_event(&app.router, &event, 2).await;

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/v1/admin/events",
        Some(json!({"eventName": event, "eventType": "team", "maxTeamSize": 2})),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        json!("An event with this name already exists")
    );
}

#[tokio::test]
async fn test_create_event_validates_team_size() {
    let Some(app) = setup().await else { return };

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/v1/admin/events",
        Some(json!({
            "eventName": unique_event_name("Oversized"),
            "eventType": "team",
            "maxTeamSize": 51,
        })),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_event_is_partial() {
    let Some(app) = setup().await else { return };
    let event = unique_event_name("Workshop");
    let event_id = create_event(&app.router, &event, 3).await;

    let (status, body) = send_json(
        &app.router,
        "PUT",
        &format!("/api/v1/admin/events/{}", event_id),
        Some(json!({"maxTeamSize": 5})),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "update failed: {}", body);
    assert_eq!(body["maxTeamSize"], json!(5));
    // Omitted fields keep their stored values.
    assert_eq!(body["eventName"], json!(event));
    assert_eq!(body["eventType"], json!("team"));
}

#[tokio::test]
async fn test_update_unknown_event_is_404() {
    let Some(app) = setup().await else { return };

    let (status, _) = send_json(
        &app.router,
        "PUT",
        "/api/v1/admin/events/999999999",
        Some(json!({"maxTeamSize": 5})),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_registrants_groups_teams_by_token() {
    let Some(app) = setup().await else { return };
    let event = unique_event_name("Robotics");
    let event_id = create_event(&app.router, &event, 3).await;

    // Leader plus one joining member.
    let leader_reg_no = unique_reg_no();
    send_json(
        &app.router,
        "POST",
        "/api/v1/register",
        Some(register_body(
            &unique_email(),
            &leader_reg_no,
            vec![json!({"name": event})],
        )),
        None,
    )
    .await;
    let (_, details) = send_json(
        &app.router,
        "GET",
        &format!("/api/v1/registrations/{}", leader_reg_no),
        None,
        None,
    )
    .await;
    let token = details["events"][0]["teamToken"].as_str().unwrap().to_string();

    let member_reg_no = unique_reg_no();
    send_json(
        &app.router,
        "POST",
        "/api/v1/register",
        Some(register_body(
            &unique_email(),
            &member_reg_no,
            vec![json!({"name": event, "token": token})],
        )),
        None,
    )
    .await;

    let (status, body) = send_json(
        &app.router,
        "GET",
        &format!("/api/v1/admin/events/{}/registrants", event_id),
        None,
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["eventName"], json!(event));

    let rows = body["registrants"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Teammates share the leader's token.
    assert!(rows.iter().all(|r| r["teamToken"] == json!(token)));
    assert!(rows.iter().any(|r| r["regNo"] == json!(leader_reg_no)));
    assert!(rows.iter().any(|r| r["regNo"] == json!(member_reg_no)));
}

#[tokio::test]
async fn test_list_registrants_unknown_event_is_404() {
    let Some(app) = setup().await else { return };

    let (status, _) = send_json(
        &app.router,
        "GET",
        "/api/v1/admin/events/999999999/registrants",
        None,
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_settings_is_partial() {
    let Some(app) = setup().await else { return };
    let original = app.state.settings.snapshot();

    // Changing the limit leaves the deadline alone.
    let (status, body) = send_json(
        &app.router,
        "PUT",
        "/api/v1/admin/settings",
        Some(json!({"limit": 5})),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eventSelectionLimit"], json!(5));
    assert_eq!(
        body["registrationDeadline"],
        serde_json::to_value(original.registration_deadline).unwrap()
    );

    // And vice versa.
    let new_deadline = Utc::now() + Duration::days(30);
    let (status, body) = send_json(
        &app.router,
        "PUT",
        "/api/v1/admin/settings",
        Some(json!({"deadline": new_deadline})),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eventSelectionLimit"], json!(5));

    let snapshot = app.state.settings.snapshot();
    assert_eq!(snapshot.event_selection_limit, 5);
    assert_eq!(snapshot.registration_deadline, new_deadline);
}

#[tokio::test]
async fn test_update_settings_rejects_zero_limit() {
    let Some(app) = setup().await else { return };

    let (status, body) = send_json(
        &app.router,
        "PUT",
        "/api/v1/admin/settings",
        Some(json!({"limit": 0})),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("at least 1"));
}

#[tokio::test]
async fn test_settings_update_takes_effect_on_registration() {
    let Some(app) = setup().await else { return };
    let events: Vec<String> = (0..2).map(|_| unique_event_name("Tight")).collect();
    for name in &events {
        create_event(&app.router, name, 1).await;
    }

    let (status, _) = send_json(
        &app.router,
        "PUT",
        "/api/v1/admin/settings",
        Some(json!({"limit": 1})),
        Some(TEST_ADMIN_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let selections: Vec<_> = events.iter().map(|n| json!({"name": n})).collect();
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/v1/register",
        Some(register_body(&unique_email(), &unique_reg_no(), selections)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("at most 1"));
}
