//! Hourly garbage collection of expired OTP rows.
//!
//! Verification already rejects stale codes; this keeps the table from
//! accumulating rows for identifiers that never verified.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use persistence::repositories::OtpRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::Job;

pub struct CleanupOtpsJob {
    repo: OtpRepository,
}

impl CleanupOtpsJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: OtpRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for CleanupOtpsJob {
    fn name(&self) -> &'static str {
        "cleanup_expired_otps"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(3600)
    }

    async fn run(&self) -> anyhow::Result<()> {
        let deleted = self
            .repo
            .delete_expired(Utc::now())
            .await
            .context("Failed to delete expired OTPs")?;

        if deleted > 0 {
            info!(deleted = deleted, "Expired OTP rows removed");
        }
        Ok(())
    }
}
