//! One-time code repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::{OtpEntity, OtpPurposeDb};
use crate::metrics::QueryTimer;

/// Repository for OTP storage.
#[derive(Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    /// Creates a new OtpRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a code for (identifier, purpose), replacing any prior live code
    /// for the same pair.
    pub async fn upsert(
        &self,
        identifier: &str,
        purpose: OtpPurposeDb,
        otp_code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("upsert_otp");
        sqlx::query(
            r#"
            INSERT INTO otp_verification (identifier, purpose, otp_code, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (identifier, purpose)
            DO UPDATE SET otp_code = EXCLUDED.otp_code,
                          expires_at = EXCLUDED.expires_at,
                          created_at = NOW()
            "#,
        )
        .bind(identifier)
        .bind(purpose)
        .bind(otp_code)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Fetch the stored code for (identifier, purpose), expired or not.
    /// Expiry is judged by the caller so it can distinguish a wrong code
    /// from a stale one.
    pub async fn find(
        &self,
        identifier: &str,
        purpose: OtpPurposeDb,
    ) -> Result<Option<OtpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_otp");
        let result = sqlx::query_as::<_, OtpEntity>(
            r#"
            SELECT identifier, purpose, otp_code, expires_at, created_at
            FROM otp_verification
            WHERE identifier = $1 AND purpose = $2
            "#,
        )
        .bind(identifier)
        .bind(purpose)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete the code for (identifier, purpose). Called on successful
    /// verification to make codes single-use.
    pub async fn consume(
        &self,
        identifier: &str,
        purpose: OtpPurposeDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("consume_otp");
        let result = sqlx::query(
            r#"
            DELETE FROM otp_verification
            WHERE identifier = $1 AND purpose = $2
            "#,
        )
        .bind(identifier)
        .bind(purpose)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Garbage-collect expired codes. Run by the hourly cleanup job; verify
    /// already rejects stale codes, this just keeps the table small.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_otps");
        let result = sqlx::query(
            r#"
            DELETE FROM otp_verification
            WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
