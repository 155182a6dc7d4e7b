//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::event::Event;
use sqlx::FromRow;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: i64,
    pub event_name: String,
    pub event_type: String,
    pub max_team_size: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            event_name: entity.event_name,
            event_type: entity.event_type,
            max_team_size: entity.max_team_size,
            created_at: entity.created_at,
        }
    }
}
