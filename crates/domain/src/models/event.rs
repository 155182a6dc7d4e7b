//! Event domain models and team-token status types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A symposium event. `max_team_size == 1` forces solo participation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub event_name: String,
    pub event_type: String,
    pub max_team_size: i32,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new event (admin).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 100, message = "Event name is required"))]
    pub event_name: String,

    #[validate(length(min = 1, max = 50, message = "Event type is required"))]
    pub event_type: String,

    #[validate(range(min = 1, max = 50, message = "Team size must be between 1 and 50"))]
    pub max_team_size: i32,
}

/// Request to update an event (admin). Omitted fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 100, message = "Event name cannot be empty"))]
    pub event_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Event type cannot be empty"))]
    pub event_type: Option<String>,

    #[validate(range(min = 1, max = 50, message = "Team size must be between 1 and 50"))]
    pub max_team_size: Option<i32>,
}

/// Advisory status of a team token for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    /// No team uses this token; a typed token must reference an existing team.
    Invalid,
    /// The team exists and has room.
    Join,
    /// The team is at capacity.
    Full,
}

/// Result of a team-token pre-check. Advisory only; the registration
/// transaction re-validates capacity at commit time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCheck {
    pub status: TokenStatus,
    pub members: i64,
    pub max_team_size: i32,
    pub message: String,
}

impl TokenCheck {
    /// Classify a membership count against an event's capacity.
    pub fn evaluate(event_name: &str, members: i64, max_team_size: i32) -> Self {
        if members == 0 {
            Self {
                status: TokenStatus::Invalid,
                members,
                max_team_size,
                message: format!(
                    "Token does not exist for {}. Ask your team leader for the correct token.",
                    event_name
                ),
            }
        } else if members < i64::from(max_team_size) {
            Self {
                status: TokenStatus::Join,
                members,
                max_team_size,
                message: format!("Team found ({}/{}). You can join.", members, max_team_size),
            }
        } else {
            Self {
                status: TokenStatus::Full,
                members,
                max_team_size,
                message: format!(
                    "Team limit reached for {}. Maximum {} members allowed.",
                    event_name, max_team_size
                ),
            }
        }
    }
}
