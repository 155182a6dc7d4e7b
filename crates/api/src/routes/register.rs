//! Registration flow endpoints: OTP issue, OTP verify, final submission.

use axum::{extract::State, Json};
use domain::models::otp::OtpPurpose;
use domain::models::student::RegisterRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_reg_no;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_reg_no"))]
    pub reg_no: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedResponse {
    pub success: bool,
    pub verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub success: bool,
    pub redirect: String,
}

/// `POST /api/v1/register/send-otp`
///
/// Gated on the deadline and on the student not already existing, so no
/// code is mailed out for a registration that could never be submitted.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<SentResponse>, ApiError> {
    req.validate()?;
    state.registration.ensure_open()?;

    let email = req.email.trim().to_lowercase();
    state
        .registration
        .ensure_not_registered(&email, req.reg_no.trim())
        .await?;

    state.otp.issue(&email, &email, OtpPurpose::Register).await?;

    Ok(Json(SentResponse {
        success: true,
        message: "OTP sent to your email".to_string(),
    }))
}

/// `POST /api/v1/register/verify-otp`
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<VerifiedResponse>, ApiError> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    state
        .otp
        .verify(&email, OtpPurpose::Register, &req.otp)
        .await?;

    Ok(Json(VerifiedResponse {
        success: true,
        verified: true,
    }))
}

/// `POST /api/v1/register` — the final, transactional submission.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisteredResponse>, ApiError> {
    req.validate()?;

    state.registration.register(req).await?;

    Ok(Json(RegisteredResponse {
        success: true,
        redirect: "/registration-success.html".to_string(),
    }))
}
