//! One-time code entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::otp::OtpPurpose;
use sqlx::FromRow;

/// Database enum for otp_purpose that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "otp_purpose", rename_all = "lowercase")]
pub enum OtpPurposeDb {
    Register,
    View,
}

impl From<OtpPurposeDb> for OtpPurpose {
    fn from(db: OtpPurposeDb) -> Self {
        match db {
            OtpPurposeDb::Register => OtpPurpose::Register,
            OtpPurposeDb::View => OtpPurpose::View,
        }
    }
}

impl From<OtpPurpose> for OtpPurposeDb {
    fn from(purpose: OtpPurpose) -> Self {
        match purpose {
            OtpPurpose::Register => OtpPurposeDb::Register,
            OtpPurpose::View => OtpPurposeDb::View,
        }
    }
}

/// Database row mapping for the otp_verification table. At most one live row
/// exists per (identifier, purpose); issuing a new code replaces it.
#[derive(Debug, Clone, FromRow)]
pub struct OtpEntity {
    pub identifier: String,
    pub purpose: OtpPurposeDb,
    pub otp_code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_conversion_roundtrip() {
        assert_eq!(OtpPurpose::from(OtpPurposeDb::Register), OtpPurpose::Register);
        assert_eq!(OtpPurposeDb::from(OtpPurpose::View), OtpPurposeDb::View);
    }
}
