//! Admin endpoints: event management, registrant listing, settings updates.
//!
//! All routes here sit behind the `require_admin` middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use domain::models::settings::{GlobalSettings, SettingsUpdate};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::entities::RegistrantEntity;
use persistence::repositories::EventRepository;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantRow {
    pub name: String,
    pub reg_no: String,
    pub college: String,
    pub email: String,
    pub team_token: Option<String>,
}

impl From<RegistrantEntity> for RegistrantRow {
    fn from(e: RegistrantEntity) -> Self {
        Self {
            name: e.name,
            reg_no: e.reg_no,
            college: e.college,
            email: e.email,
            team_token: e.team_token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantsResponse {
    pub event: Event,
    pub registrants: Vec<RegistrantRow>,
}

/// `POST /api/v1/admin/events`
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    req.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let created = repo
        .create(
            req.event_name.trim(),
            req.event_type.trim(),
            req.max_team_size,
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("An event with this name already exists".into())
            }
            other => other,
        })?;

    info!(event = %created.event_name, "Event created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// `PUT /api/v1/admin/events/:id` — partial update; omitted fields are kept.
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    req.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let updated = repo
        .update(
            event_id,
            req.event_name.as_deref().map(str::trim),
            req.event_type.as_deref().map(str::trim),
            req.max_team_size,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    info!(event = %updated.event_name, "Event updated");
    Ok(Json(updated.into()))
}

/// `GET /api/v1/admin/events/:id/registrants` — everyone registered for the
/// event, teams grouped by token.
pub async fn list_registrants(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<RegistrantsResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    let registrants = repo
        .list_registrants(event_id)
        .await?
        .into_iter()
        .map(RegistrantRow::from)
        .collect();

    Ok(Json(RegistrantsResponse {
        event: event.into(),
        registrants,
    }))
}

/// `PUT /api/v1/admin/settings` — partial update of the in-memory settings.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<GlobalSettings>, ApiError> {
    if let Some(limit) = update.limit {
        if limit == 0 {
            return Err(ApiError::Validation(
                "Selection limit must be at least 1".into(),
            ));
        }
    }

    let settings = state.settings.apply(update);
    info!(
        limit = settings.event_selection_limit,
        deadline = %settings.registration_deadline,
        "Settings updated"
    );
    Ok(Json(settings))
}
