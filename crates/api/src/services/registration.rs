//! Registration flow coordinator.
//!
//! Orders the gates (deadline, selection limit, duplicate pre-check, event
//! resolution, token synthesis) in front of the single database transaction,
//! then fires the confirmation email after commit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domain::models::event::Event;
use domain::models::student::{
    EventMembership, EventSelection, RegisterRequest, RegistrationDetails,
};
use domain::services::notification::{Notification, Notifier};
use domain::services::settings::SettingsStore;
use persistence::repositories::{
    EventRepository, NewStudent, RegistrationError, RegistrationRepository, ResolvedSelection,
    StudentRepository,
};
use shared::codes::generate_team_token;
use tracing::{error, info};

use crate::error::ApiError;
use crate::middleware::metrics::{record_registration_completed, record_registration_rejected};

#[derive(Clone)]
pub struct RegistrationService {
    events: EventRepository,
    students: StudentRepository,
    registrations: RegistrationRepository,
    settings: SettingsStore,
    notifier: Arc<dyn Notifier>,
}

impl RegistrationService {
    pub fn new(
        events: EventRepository,
        students: StudentRepository,
        registrations: RegistrationRepository,
        settings: SettingsStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            events,
            students,
            registrations,
            settings,
            notifier,
        }
    }

    /// Gate that both send-otp and the final submission pass: reject once the
    /// deadline is behind us.
    pub fn ensure_open(&self) -> Result<(), ApiError> {
        if self.settings.is_closed(Utc::now()) {
            record_registration_rejected("closed");
            return Err(ApiError::Closed);
        }
        Ok(())
    }

    /// Duplicate pre-check shared with send-otp. Advisory; the unique
    /// constraints inside the transaction are authoritative.
    pub async fn ensure_not_registered(&self, email: &str, reg_no: &str) -> Result<(), ApiError> {
        if self.students.exists_by_email_or_reg_no(email, reg_no).await? {
            record_registration_rejected("duplicate");
            return Err(ApiError::Conflict("Student already registered".into()));
        }
        Ok(())
    }

    /// Run the full registration: gates, event resolution, token synthesis,
    /// the atomic write, and the post-commit confirmation email.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegistrationDetails, ApiError> {
        self.ensure_open()?;

        let limit = self.settings.snapshot().event_selection_limit;
        if req.events.len() > limit as usize {
            record_registration_rejected("selection_limit");
            return Err(ApiError::Validation(format!(
                "You can select at most {} events",
                limit
            )));
        }

        self.ensure_not_registered(&req.email, &req.reg_no).await?;

        let names: Vec<String> = req
            .events
            .iter()
            .map(|s| s.name.trim().to_string())
            .collect();
        let resolved = self.events.find_by_names(&names).await?;
        let by_name: HashMap<String, Event> = resolved
            .into_iter()
            .map(Event::from)
            .map(|e| (e.event_name.clone(), e))
            .collect();

        let selections = plan_selections(&req.events, &by_name)?;

        let student = NewStudent {
            name: req.name.trim().to_string(),
            reg_no: req.reg_no.trim().to_string(),
            college: req.college.trim().to_string(),
            department: req.department.trim().to_string(),
            year: req.year,
            email: req.email.trim().to_lowercase(),
            phone: req.phone.trim().to_string(),
        };

        let inserted = self
            .registrations
            .register(&student, &selections)
            .await
            .map_err(|e| {
                match &e {
                    RegistrationError::DuplicateStudent => record_registration_rejected("duplicate"),
                    RegistrationError::UnknownToken { .. } => {
                        record_registration_rejected("invalid_token")
                    }
                    RegistrationError::TeamFull { .. } => record_registration_rejected("team_full"),
                    RegistrationError::Database(_) => {}
                }
                ApiError::from(e)
            })?;

        record_registration_completed(selections.len());
        info!(
            reg_no = %inserted.reg_no,
            events = selections.len(),
            "Registration committed"
        );

        let memberships: Vec<EventMembership> = selections
            .iter()
            .map(|s| EventMembership {
                event_name: s.event_name.clone(),
                team_token: s.team_token.clone(),
            })
            .collect();

        let details = RegistrationDetails {
            student: inserted.into(),
            events: memberships,
        };

        // The registration is committed; confirmation delivery must not be
        // able to fail the request.
        let notifier = Arc::clone(&self.notifier);
        let confirmation = confirmation_notification(&details);
        tokio::spawn(async move {
            if let Err(e) = notifier.send(confirmation).await {
                error!("Confirmation email failed: {}", e);
            }
        });

        Ok(details)
    }
}

/// Turn validated selections into transaction inputs.
///
/// Unknown event names reject the whole request. Solo events (capacity 1)
/// never carry a token even when one was typed. A typed token on a team
/// event is a join; an absent token makes the student a team leader with a
/// freshly generated token.
fn plan_selections(
    selections: &[EventSelection],
    by_name: &HashMap<String, Event>,
) -> Result<Vec<ResolvedSelection>, ApiError> {
    let mut seen = std::collections::HashSet::new();
    let mut planned = Vec::with_capacity(selections.len());

    for selection in selections {
        let name = selection.name.trim();
        if !seen.insert(name.to_string()) {
            return Err(ApiError::Validation(format!(
                "Event {} selected more than once",
                name
            )));
        }

        let event = by_name.get(name).ok_or_else(|| {
            ApiError::Validation(format!("Unknown event: {}", name))
        })?;

        let (team_token, joining) = if event.max_team_size <= 1 {
            (None, false)
        } else if let Some(token) = selection.supplied_token() {
            (Some(token.to_string()), true)
        } else {
            (Some(generate_team_token(&event.event_name)), false)
        };

        planned.push(ResolvedSelection {
            event_id: event.id,
            event_name: event.event_name.clone(),
            team_token,
            joining,
        });
    }

    Ok(planned)
}

fn confirmation_notification(details: &RegistrationDetails) -> Notification {
    let mut rows = String::new();
    for membership in &details.events {
        let token_cell = membership.team_token.as_deref().unwrap_or("solo");
        rows.push_str(&format!(
            "<li>{} &mdash; token: <strong>{}</strong></li>",
            membership.event_name, token_cell
        ));
    }

    let html_body = format!(
        "<p>Hi {},</p>\
         <p>Your registration ({}) is confirmed. Your events:</p>\
         <ul>{}</ul>\
         <p>Share a team token with your teammates so they can join your team.</p>",
        details.student.name, details.student.reg_no, rows
    );

    Notification {
        recipient: details.student.email.clone(),
        subject: "Registration confirmed".to_string(),
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::student::Student;

    fn event(id: i64, name: &str, max: i32) -> Event {
        Event {
            id,
            event_name: name.to_string(),
            event_type: if max > 1 { "team" } else { "solo" }.to_string(),
            max_team_size: max,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> HashMap<String, Event> {
        [event(1, "Hackathon", 4), event(2, "Quiz", 1)]
            .into_iter()
            .map(|e| (e.event_name.clone(), e))
            .collect()
    }

    fn selection(name: &str, token: Option<&str>) -> EventSelection {
        EventSelection {
            name: name.to_string(),
            token: token.map(|t| t.to_string()),
        }
    }

    #[test]
    fn test_plan_generates_token_for_team_leader() {
        let planned = plan_selections(&[selection("Hackathon", None)], &catalog()).unwrap();
        assert_eq!(planned.len(), 1);
        let token = planned[0].team_token.as_deref().unwrap();
        assert!(token.starts_with("HAC-"));
        assert!(!planned[0].joining);
    }

    #[test]
    fn test_plan_typed_token_is_a_join() {
        let planned =
            plan_selections(&[selection("Hackathon", Some("HAC-7X29Q381"))], &catalog()).unwrap();
        assert_eq!(planned[0].team_token.as_deref(), Some("HAC-7X29Q381"));
        assert!(planned[0].joining);
    }

    #[test]
    fn test_plan_forces_solo_event_tokenless() {
        // Even a typed token is dropped when the event has capacity 1.
        let planned =
            plan_selections(&[selection("Quiz", Some("QUI-ABCDE123"))], &catalog()).unwrap();
        assert!(planned[0].team_token.is_none());
        assert!(!planned[0].joining);
    }

    #[test]
    fn test_plan_rejects_unknown_event() {
        let result = plan_selections(&[selection("Cooking", None)], &catalog());
        match result {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("Cooking")),
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_plan_rejects_duplicate_selection() {
        let result = plan_selections(
            &[selection("Hackathon", None), selection("Hackathon", None)],
            &catalog(),
        );
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_plan_blank_token_means_leader() {
        let planned =
            plan_selections(&[selection("Hackathon", Some("   "))], &catalog()).unwrap();
        assert!(!planned[0].joining);
        assert!(planned[0].team_token.is_some());
    }

    #[test]
    fn test_confirmation_lists_all_events() {
        let details = RegistrationDetails {
            student: Student {
                id: 1,
                name: "Priya Sharma".to_string(),
                reg_no: "123456789012".to_string(),
                college: "Anna University".to_string(),
                department: "Computer Science".to_string(),
                year: 3,
                email: "priya@example.com".to_string(),
                phone: "9876543210".to_string(),
                created_at: Utc::now(),
            },
            events: vec![
                EventMembership {
                    event_name: "Hackathon".to_string(),
                    team_token: Some("HAC-7X29Q381".to_string()),
                },
                EventMembership {
                    event_name: "Quiz".to_string(),
                    team_token: None,
                },
            ],
        };

        let n = confirmation_notification(&details);
        assert_eq!(n.recipient, "priya@example.com");
        assert!(n.html_body.contains("HAC-7X29Q381"));
        assert!(n.html_body.contains("Quiz"));
        assert!(n.html_body.contains("solo"));
    }
}
