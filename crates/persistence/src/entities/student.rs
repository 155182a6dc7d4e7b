//! Student and membership entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::student::{EventMembership, Student};
use sqlx::FromRow;

/// Database row mapping for the students table.
#[derive(Debug, Clone, FromRow)]
pub struct StudentEntity {
    pub id: i64,
    pub name: String,
    pub reg_no: String,
    pub college: String,
    pub department: String,
    pub year: i32,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<StudentEntity> for Student {
    fn from(entity: StudentEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            reg_no: entity.reg_no,
            college: entity.college,
            department: entity.department,
            year: entity.year,
            email: entity.email,
            phone: entity.phone,
            created_at: entity.created_at,
        }
    }
}

/// One student_events row joined with the event name.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipWithEventEntity {
    pub event_name: String,
    pub team_token: Option<String>,
}

impl From<MembershipWithEventEntity> for EventMembership {
    fn from(entity: MembershipWithEventEntity) -> Self {
        Self {
            event_name: entity.event_name,
            team_token: entity.team_token,
        }
    }
}

/// One registrant of an event, as listed for admins.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrantEntity {
    pub name: String,
    pub reg_no: String,
    pub college: String,
    pub email: String,
    pub team_token: Option<String>,
}
