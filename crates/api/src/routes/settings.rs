//! Public settings endpoint. The frontend uses this to cap the event picker
//! and to show the deadline.

use axum::{extract::State, Json};
use domain::models::settings::GlobalSettings;

use crate::app::AppState;

/// `GET /api/v1/settings`
pub async fn get_settings(State(state): State<AppState>) -> Json<GlobalSettings> {
    Json(state.settings.snapshot())
}
