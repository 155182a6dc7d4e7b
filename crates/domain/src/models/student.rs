//! Student domain models and registration DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::{validate_alpha_name, validate_phone, validate_reg_no, validate_year};

/// A registered student. Created once at final submission, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub reg_no: String,
    pub college: String,
    pub department: String,
    pub year: i32,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// One event chosen during registration, with an optional team token.
///
/// A missing/empty token on a team event means the student is a leader and a
/// fresh token is generated; a supplied token means they join that team.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventSelection {
    #[validate(length(min = 1, message = "Event name is required"))]
    pub name: String,

    pub token: Option<String>,
}

impl EventSelection {
    /// The supplied token, with empty/whitespace strings treated as absent.
    pub fn supplied_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Request body for final registration submission.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[validate(custom(function = "validate_alpha_name"))]
    pub name: String,

    #[validate(custom(function = "validate_reg_no"))]
    pub reg_no: String,

    #[validate(length(min = 1, max = 150, message = "College is required"))]
    #[validate(custom(function = "validate_alpha_name"))]
    pub college: String,

    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    #[validate(custom(function = "validate_alpha_name"))]
    pub department: String,

    #[validate(custom(function = "validate_year"))]
    pub year: i32,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Select at least one event"))]
    #[validate(nested)]
    pub events: Vec<EventSelection>,
}

/// One committed event membership, as shown to the student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMembership {
    pub event_name: String,
    pub team_token: Option<String>,
}

/// A student's registration with all event memberships.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetails {
    pub student: Student,
    pub events: Vec<EventMembership>,
}
