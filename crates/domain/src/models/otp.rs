//! One-time code models.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Purpose an OTP is bound to. A code issued for one purpose can never
/// verify the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpPurpose {
    /// Identity verification before registration.
    Register,
    /// Access to view an existing registration.
    View,
}

impl OtpPurpose {
    /// Validity window for codes issued with this purpose.
    pub fn ttl(&self) -> Duration {
        match self {
            OtpPurpose::Register => Duration::minutes(10),
            OtpPurpose::View => Duration::minutes(5),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Register => "register",
            OtpPurpose::View => "view",
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a verification attempt failed. Nothing is consumed on failure, so the
/// client may retry until the code expires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    #[error("No code was requested for this identifier")]
    NotFound,

    #[error("Invalid OTP")]
    Invalid,

    #[error("OTP has expired. Please request a new one")]
    Expired,

    #[error("Daily OTP limit reached. Try again tomorrow")]
    RateLimited,
}
