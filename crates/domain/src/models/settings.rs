//! Global settings models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Process-wide registration settings. Held in memory only; re-seeded from
/// configuration on restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Maximum number of events one student may select.
    pub event_selection_limit: u32,
    /// Registrations submitted after this instant are rejected.
    pub registration_deadline: DateTime<Utc>,
}

/// Partial settings update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub limit: Option<u32>,
    pub deadline: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_update_deserializes_partial_body() {
        let update: SettingsUpdate = serde_json::from_str(r#"{"limit": 5}"#).unwrap();
        assert_eq!(update.limit, Some(5));
        assert!(update.deadline.is_none());

        let update: SettingsUpdate =
            serde_json::from_str(r#"{"deadline": "2026-03-15T09:00:00Z"}"#).unwrap();
        assert!(update.limit.is_none());
        assert!(update.deadline.is_some());
    }
}
