//! View-access endpoints: look up an existing registration behind an OTP.
//!
//! The identifier for view OTPs is the register number; the code is mailed
//! to the address on file so only the inbox owner can read the details.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::otp::OtpPurpose;
use domain::models::student::RegistrationDetails;
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_reg_no;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::StudentRepository;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ViewSendOtpRequest {
    #[validate(custom(function = "validate_reg_no"))]
    pub reg_no: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ViewVerifyOtpRequest {
    #[validate(custom(function = "validate_reg_no"))]
    pub reg_no: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOtpSentResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewVerifiedResponse {
    pub success: bool,
    pub registration: RegistrationDetails,
}

/// `POST /api/v1/view/send-otp`
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<ViewSendOtpRequest>,
) -> Result<Json<ViewOtpSentResponse>, ApiError> {
    req.validate()?;

    let reg_no = req.reg_no.trim();
    let students = StudentRepository::new(state.pool.clone());
    let student = students
        .find_by_reg_no(reg_no)
        .await?
        .ok_or_else(|| ApiError::NotFound("No registration found for this number".into()))?;

    state
        .otp
        .issue(reg_no, &student.email, OtpPurpose::View)
        .await?;

    Ok(Json(ViewOtpSentResponse {
        success: true,
        message: "OTP sent to your registered email".to_string(),
    }))
}

/// `POST /api/v1/view/verify-otp` — a correct code answers with the full
/// registration, so the client needs no second round trip.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<ViewVerifyOtpRequest>,
) -> Result<Json<ViewVerifiedResponse>, ApiError> {
    req.validate()?;

    let reg_no = req.reg_no.trim();
    state.otp.verify(reg_no, OtpPurpose::View, &req.otp).await?;

    let registration = fetch_registration(&state, reg_no).await?;
    Ok(Json(ViewVerifiedResponse {
        success: true,
        registration,
    }))
}

/// `GET /api/v1/registrations/:reg_no`
pub async fn get_registration(
    State(state): State<AppState>,
    Path(reg_no): Path<String>,
) -> Result<Json<RegistrationDetails>, ApiError> {
    let registration = fetch_registration(&state, reg_no.trim()).await?;
    Ok(Json(registration))
}

async fn fetch_registration(
    state: &AppState,
    reg_no: &str,
) -> Result<RegistrationDetails, ApiError> {
    let students = StudentRepository::new(state.pool.clone());
    let student = students
        .find_by_reg_no(reg_no)
        .await?
        .ok_or_else(|| ApiError::NotFound("No registration found for this number".into()))?;

    let memberships = students.list_memberships(student.id).await?;

    Ok(RegistrationDetails {
        student: student.into(),
        events: memberships.into_iter().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_send_otp_request_validation() {
        let ok = ViewSendOtpRequest {
            reg_no: "123456789012".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = ViewSendOtpRequest {
            reg_no: "12ab".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_view_verify_request_validation() {
        let ok = ViewVerifyOtpRequest {
            reg_no: "123456789012".to_string(),
            otp: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_otp = ViewVerifyOtpRequest {
            reg_no: "123456789012".to_string(),
            otp: "12345678".to_string(),
        };
        assert!(bad_otp.validate().is_err());
    }
}
