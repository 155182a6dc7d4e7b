//! Daily reset of the view-OTP quota counters.
//!
//! `DailyQuota` already restarts a counter when it sees a new date, so this
//! job exists to bound memory: it drops counters for identifiers that never
//! come back.

use std::sync::Arc;
use std::time::Duration;

use domain::services::quota::DailyQuota;
use tracing::info;

use super::scheduler::Job;

pub struct QuotaResetJob {
    quota: Arc<DailyQuota>,
}

impl QuotaResetJob {
    pub fn new(quota: Arc<DailyQuota>) -> Self {
        Self { quota }
    }
}

#[async_trait::async_trait]
impl Job for QuotaResetJob {
    fn name(&self) -> &'static str {
        "reset_otp_quota"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(86400)
    }

    async fn run(&self) -> anyhow::Result<()> {
        let tracked = self.quota.tracked();
        self.quota.reset();
        info!(dropped = tracked, "OTP quota counters cleared");
        Ok(())
    }
}
