//! Per-identifier burst limiting for OTP issuance.
//!
//! The calendar-day quota in the domain crate caps how many view codes an
//! identifier gets per day; this limiter additionally stops rapid-fire
//! re-requests of any OTP within the minute.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

type IdentifierLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Sliding-window limiter keyed by identifier (email or register number).
pub struct BurstLimiter {
    limiters: RwLock<HashMap<String, Arc<IdentifierLimiter>>>,
    requests_per_minute: u32,
}

impl BurstLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            requests_per_minute,
        }
    }

    fn get_or_create_limiter(&self, identifier: &str) -> Arc<IdentifierLimiter> {
        {
            let limiters = self.limiters.read().expect("limiter lock poisoned");
            if let Some(limiter) = limiters.get(identifier) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().expect("limiter lock poisoned");
        // Double-check in case another thread created it
        if let Some(limiter) = limiters.get(identifier) {
            return limiter.clone();
        }

        let per_minute = NonZeroU32::new(self.requests_per_minute)
            .unwrap_or_else(|| NonZeroU32::new(5).expect("nonzero"));
        let limiter = Arc::new(GovRateLimiter::direct(Quota::per_minute(per_minute)));
        limiters.insert(identifier.to_string(), limiter.clone());
        limiter
    }

    /// Check one issuance attempt for `identifier`. Err carries the seconds
    /// the client should wait before retrying, at least 1.
    pub fn check(&self, identifier: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(identifier);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for BurstLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BurstLimiter")
            .field("requests_per_minute", &self.requests_per_minute)
            .field(
                "active_identifiers",
                &self.limiters.read().expect("limiter lock poisoned").len(),
            )
            .finish()
    }
}
