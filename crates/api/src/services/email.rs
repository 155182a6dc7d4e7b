//! Email dispatch behind the domain `Notifier` trait.
//!
//! Providers:
//! - `console`: logs the message (development)
//! - `resend`: sends via the Resend HTTPS API

use async_trait::async_trait;
use domain::services::notification::{Notification, Notifier, NotifyError};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Email service sending transactional mail to students.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn send_console(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            to = %notification.recipient,
            subject = %notification.subject,
            "Email (console provider)"
        );
        debug!(
            body_length = notification.html_body.len(),
            "Email body ({} chars)",
            notification.html_body.len()
        );
        Ok(())
    }

    async fn send_resend(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.config.resend_api_key.is_empty() {
            return Err(NotifyError::NotConfigured(
                "resend_api_key is empty".to_string(),
            ));
        }

        let body = serde_json::json!({
            "from": format!("{} <{}>", self.config.sender_name, self.config.sender_email),
            "to": [notification.recipient],
            "subject": notification.subject,
            "html": notification.html_body,
        });

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.resend_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::SendFailed(format!("Resend request failed: {}", e)))?;

        if response.status().is_success() {
            info!(subject = %body["subject"], "Email sent via Resend");
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_body, "Resend API error");
            Err(NotifyError::SendFailed(format!(
                "Resend returned {}: {}",
                status, error_body
            )))
        }
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        if !self.config.enabled {
            debug!(
                to = %notification.recipient,
                subject = %notification.subject,
                "Email disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(notification).await,
            "resend" => self.send_resend(notification).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(NotifyError::NotConfigured(format!(
                    "Unknown email provider: {}",
                    provider
                )))
            }
        }
    }
}
