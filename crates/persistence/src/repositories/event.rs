//! Event repository for database operations.

use sqlx::PgPool;

use crate::entities::{EventEntity, RegistrantEntity};
use crate::metrics::QueryTimer;

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all events, oldest first.
    pub async fn list_all(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, event_name, event_type, max_team_size, created_at
            FROM events
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, event_name, event_type, max_team_size, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Resolve a batch of event names to rows. Names without a matching
    /// event are simply absent from the result.
    pub async fn find_by_names(&self, names: &[String]) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_events_by_names");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, event_name, event_type, max_team_size, created_at
            FROM events
            WHERE event_name = ANY($1)
            "#,
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new event.
    pub async fn create(
        &self,
        event_name: &str,
        event_type: &str,
        max_team_size: i32,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (event_name, event_type, max_team_size)
            VALUES ($1, $2, $3)
            RETURNING id, event_name, event_type, max_team_size, created_at
            "#,
        )
        .bind(event_name)
        .bind(event_type)
        .bind(max_team_size)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an event; omitted fields keep their current value.
    pub async fn update(
        &self,
        id: i64,
        event_name: Option<&str>,
        event_type: Option<&str>,
        max_team_size: Option<i32>,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET event_name = COALESCE($2, event_name),
                event_type = COALESCE($3, event_type),
                max_team_size = COALESCE($4, max_team_size)
            WHERE id = $1
            RETURNING id, event_name, event_type, max_team_size, created_at
            "#,
        )
        .bind(id)
        .bind(event_name)
        .bind(event_type)
        .bind(max_team_size)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count committed memberships for one (event, token) team.
    ///
    /// Advisory: the registration transaction recounts under a lock before
    /// inserting, so this value may be stale by the time a client acts on it.
    pub async fn count_team_members(
        &self,
        event_id: i64,
        token: &str,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_team_members");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM student_events
            WHERE event_id = $1 AND team_token = $2
            "#,
        )
        .bind(event_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all registrants of an event with their team tokens, grouped so
    /// that teams come out adjacent.
    pub async fn list_registrants(
        &self,
        event_id: i64,
    ) -> Result<Vec<RegistrantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_event_registrants");
        let result = sqlx::query_as::<_, RegistrantEntity>(
            r#"
            SELECT s.name, s.reg_no, s.college, s.email, se.team_token
            FROM student_events se
            JOIN students s ON se.student_id = s.id
            WHERE se.event_id = $1
            ORDER BY se.team_token NULLS LAST, s.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
