//! Event listing and the advisory team-token pre-check.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::event::{Event, TokenCheck};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::EventRepository;

#[derive(Debug, Deserialize)]
pub struct TokenStatusQuery {
    pub token: Option<String>,
}

/// `GET /api/v1/events` — the public event catalog.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events = repo
        .list_all()
        .await?
        .into_iter()
        .map(Event::from)
        .collect();
    Ok(Json(events))
}

/// `GET /api/v1/events/:id/token-status?token=T`
///
/// Advisory occupancy check so the frontend can tell the student whether a
/// typed token exists and has room. The registration transaction re-checks
/// at commit time, so a `join` answer here can still fail later.
pub async fn token_status(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<TokenStatusQuery>,
) -> Result<Json<TokenCheck>, ApiError> {
    let token = query
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("Token is required".into()))?;

    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    let members = repo.count_team_members(event_id, token).await?;
    let check = TokenCheck::evaluate(&event.event_name, members, event.max_team_size);
    Ok(Json(check))
}
