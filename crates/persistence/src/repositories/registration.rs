//! Registration transaction: atomic student + membership writes.
//!
//! All capacity decisions are re-derived in here, under the same transaction
//! that performs the inserts. The advisory token pre-check in the API is
//! pure UX; this is the enforcement point.

use sqlx::PgPool;

use crate::entities::StudentEntity;
use crate::metrics::QueryTimer;

/// Profile fields for the student row to be inserted.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub reg_no: String,
    pub college: String,
    pub department: String,
    pub year: i32,
    pub email: String,
    pub phone: String,
}

/// One event selection after name resolution and token synthesis.
#[derive(Debug, Clone)]
pub struct ResolvedSelection {
    pub event_id: i64,
    pub event_name: String,
    /// None for solo participation.
    pub team_token: Option<String>,
    /// True when the student typed the token (joining an existing team);
    /// false when the token was freshly generated for a team leader.
    pub joining: bool,
}

/// Failures of the registration transaction. Any error leaves no rows behind.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Student already registered")]
    DuplicateStudent,

    #[error("Token {token} does not exist for {event_name}")]
    UnknownToken { event_name: String, token: String },

    #[error("Team limit reached for {event_name}. Maximum {max_team_size} members allowed.")]
    TeamFull {
        event_name: String,
        max_team_size: i32,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository owning the atomic registration write path.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the student and all memberships as one all-or-nothing unit.
    ///
    /// Concurrency: the student insert races on the reg_no/email unique
    /// indexes (loser gets `DuplicateStudent`). For each tokened selection
    /// the event row is locked with `SELECT ... FOR UPDATE` before the
    /// member count, so two joins racing for the last seat of a team are
    /// serialized and exactly one sees the team full.
    pub async fn register(
        &self,
        student: &NewStudent,
        selections: &[ResolvedSelection],
    ) -> Result<StudentEntity, RegistrationError> {
        let timer = QueryTimer::new("register_student_with_events");
        let result = self.register_inner(student, selections).await;
        timer.record();
        result
    }

    async fn register_inner(
        &self,
        student: &NewStudent,
        selections: &[ResolvedSelection],
    ) -> Result<StudentEntity, RegistrationError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, StudentEntity>(
            r#"
            INSERT INTO students (name, reg_no, college, department, year, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, reg_no, college, department, year, email, phone, created_at
            "#,
        )
        .bind(&student.name)
        .bind(&student.reg_no)
        .bind(&student.college)
        .bind(&student.department)
        .bind(student.year)
        .bind(&student.email)
        .bind(&student.phone)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RegistrationError::DuplicateStudent
            } else {
                RegistrationError::Database(e)
            }
        })?;

        for selection in selections {
            if let Some(token) = &selection.team_token {
                // Locking the event row serializes capacity checks for this
                // event; the count below cannot race another join.
                let max_team_size = sqlx::query_scalar::<_, i32>(
                    r#"
                    SELECT max_team_size FROM events WHERE id = $1 FOR UPDATE
                    "#,
                )
                .bind(selection.event_id)
                .fetch_one(&mut *tx)
                .await?;

                let members = sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM student_events
                    WHERE event_id = $1 AND team_token = $2
                    "#,
                )
                .bind(selection.event_id)
                .bind(token)
                .fetch_one(&mut *tx)
                .await?;

                if selection.joining && members == 0 {
                    return Err(RegistrationError::UnknownToken {
                        event_name: selection.event_name.clone(),
                        token: token.clone(),
                    });
                }
                if members >= i64::from(max_team_size) {
                    return Err(RegistrationError::TeamFull {
                        event_name: selection.event_name.clone(),
                        max_team_size,
                    });
                }
            }

            sqlx::query(
                r#"
                INSERT INTO student_events (student_id, event_id, team_token)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(inserted.id)
            .bind(selection.event_id)
            .bind(selection.team_token.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
