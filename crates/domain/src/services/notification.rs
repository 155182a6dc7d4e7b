//! Notification dispatch abstraction.
//!
//! The core only needs "send a message to this address"; delivery mechanics
//! (Resend, console logging) live behind this trait in the api crate.

use async_trait::async_trait;

/// Errors surfaced by a notifier. Fatal for OTP delivery requests, logged and
/// swallowed for post-commit confirmations.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification provider not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to send notification: {0}")]
    SendFailed(String),
}

/// An outbound message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// Sends notifications to students.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Mock notifier for tests: records sent messages, optionally fails.
#[derive(Debug, Default)]
pub struct MockNotifier {
    pub simulate_failure: bool,
    sent: std::sync::Mutex<Vec<Notification>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that fails every send.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Messages recorded so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("mock notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.simulate_failure {
            tracing::warn!(
                recipient = %notification.recipient,
                "Mock notifier simulating failure"
            );
            return Err(NotifyError::SendFailed("Simulated failure".to_string()));
        }

        tracing::info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "Mock: would send notification"
        );
        self.sent
            .lock()
            .expect("mock notifier lock poisoned")
            .push(notification);
        Ok(())
    }
}
