//! Per-identifier daily quota for view-access OTP issuance.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

/// Tracks how many OTPs each identifier has been issued on the current
/// server-local calendar day. Counters are checked against the caller's date
/// on every access and cleared wholesale by the daily reset job.
#[derive(Debug)]
pub struct DailyQuota {
    max_per_day: u32,
    counters: Mutex<HashMap<String, (NaiveDate, u32)>>,
}

impl DailyQuota {
    /// Create a quota allowing `max_per_day` successful issuances per
    /// identifier per calendar day.
    pub fn new(max_per_day: u32) -> Self {
        Self {
            max_per_day,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Try to consume one issuance for `identifier` on `today`. Returns false
    /// when the quota for the day is exhausted. A counter from an earlier
    /// date is stale and restarts at zero.
    pub fn try_acquire(&self, identifier: &str, today: NaiveDate) -> bool {
        let mut counters = self.counters.lock().expect("quota lock poisoned");
        let entry = counters
            .entry(identifier.to_string())
            .or_insert((today, 0));
        if entry.0 != today {
            *entry = (today, 0);
        }
        if entry.1 >= self.max_per_day {
            return false;
        }
        entry.1 += 1;
        true
    }

    /// Hand back one issuance for `identifier` on `day`. Only a successful
    /// issuance counts against the quota, so a caller that acquired a slot
    /// but failed to deliver a code returns it here. A release for a
    /// different day or an unknown identifier is a no-op.
    pub fn release(&self, identifier: &str, day: NaiveDate) {
        let mut counters = self.counters.lock().expect("quota lock poisoned");
        if let Some(entry) = counters.get_mut(identifier) {
            if entry.0 == day && entry.1 > 0 {
                entry.1 -= 1;
            }
        }
    }

    /// Drop all counters. Called by the daily reset job; also bounds memory
    /// since stale identifiers would otherwise accumulate.
    pub fn reset(&self) {
        self.counters.lock().expect("quota lock poisoned").clear();
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.counters.lock().expect("quota lock poisoned").len()
    }
}
