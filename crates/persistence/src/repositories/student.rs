//! Student repository for database operations.

use sqlx::PgPool;

use crate::entities::{MembershipWithEventEntity, StudentEntity};
use crate::metrics::QueryTimer;

/// Repository for student-related database operations.
#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    /// Creates a new StudentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a student by register number.
    pub async fn find_by_reg_no(&self, reg_no: &str) -> Result<Option<StudentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_student_by_reg_no");
        let result = sqlx::query_as::<_, StudentEntity>(
            r#"
            SELECT id, name, reg_no, college, department, year, email, phone, created_at
            FROM students
            WHERE reg_no = $1
            "#,
        )
        .bind(reg_no)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a student already exists with this email or register number.
    ///
    /// Pre-check only; the unique constraints inside the registration
    /// transaction are the authoritative guard.
    pub async fn exists_by_email_or_reg_no(
        &self,
        email: &str,
        reg_no: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("student_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM students WHERE email = $1 OR reg_no = $2)
            "#,
        )
        .bind(email)
        .bind(reg_no)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a student's event memberships with event names.
    pub async fn list_memberships(
        &self,
        student_id: i64,
    ) -> Result<Vec<MembershipWithEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_student_memberships");
        let result = sqlx::query_as::<_, MembershipWithEventEntity>(
            r#"
            SELECT e.event_name, se.team_token
            FROM student_events se
            JOIN events e ON se.event_id = e.id
            WHERE se.student_id = $1
            ORDER BY e.event_name
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
