//! In-memory store for process-wide registration settings.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::models::settings::{GlobalSettings, SettingsUpdate};

/// Shared handle to the global settings. Updates are simple field
/// replacements with no cross-field invariant, so a plain `RwLock` suffices.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<GlobalSettings>>,
}

impl SettingsStore {
    /// Create a store seeded with the given settings.
    pub fn new(initial: GlobalSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Current settings snapshot.
    pub fn snapshot(&self) -> GlobalSettings {
        self.inner.read().expect("settings lock poisoned").clone()
    }

    /// Apply a partial update, leaving omitted fields unchanged. Returns the
    /// resulting settings.
    pub fn apply(&self, update: SettingsUpdate) -> GlobalSettings {
        let mut settings = self.inner.write().expect("settings lock poisoned");
        if let Some(limit) = update.limit {
            settings.event_selection_limit = limit;
        }
        if let Some(deadline) = update.deadline {
            settings.registration_deadline = deadline;
        }
        settings.clone()
    }

    /// Whether the registration deadline has passed at `now`.
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now > self.snapshot().registration_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> SettingsStore {
        SettingsStore::new(GlobalSettings {
            event_selection_limit: 3,
            registration_deadline: Utc::now() + Duration::days(30),
        })
    }

    #[test]
    fn test_snapshot_returns_seeded_values() {
        let store = store();
        assert_eq!(store.snapshot().event_selection_limit, 3);
    }

    #[test]
    fn test_apply_updates_only_given_fields() {
        let store = store();
        let before = store.snapshot();

        let after = store.apply(SettingsUpdate {
            limit: Some(5),
            deadline: None,
        });
        assert_eq!(after.event_selection_limit, 5);
        assert_eq!(after.registration_deadline, before.registration_deadline);

        let new_deadline = Utc::now() + Duration::days(60);
        let after = store.apply(SettingsUpdate {
            limit: None,
            deadline: Some(new_deadline),
        });
        assert_eq!(after.event_selection_limit, 5);
        assert_eq!(after.registration_deadline, new_deadline);
    }

    #[test]
    fn test_is_closed_respects_deadline() {
        let store = store();
        assert!(!store.is_closed(Utc::now()));

        store.apply(SettingsUpdate {
            limit: None,
            deadline: Some(Utc::now() - Duration::hours(1)),
        });
        assert!(store.is_closed(Utc::now()));
    }

    #[test]
    fn test_clones_share_state() {
        let store = store();
        let clone = store.clone();
        clone.apply(SettingsUpdate {
            limit: Some(7),
            deadline: None,
        });
        assert_eq!(store.snapshot().event_selection_limit, 7);
    }
}
