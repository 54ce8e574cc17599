//! Confirmation mail delivery

use async_trait::async_trait;

use super::ServiceError;
use crate::config::MailSettings;
use crate::models::Email;

/// Link a user follows to confirm their address.
///
/// `base_url` is the externally visible origin, with or without a trailing
/// slash.
pub fn confirmation_link(base_url: &str, token: &str) -> String {
    format!(
        "{}/api/auth/confirmed_email/{}",
        base_url.trim_end_matches('/'),
        token
    )
}

/// Sends account e-mails
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_confirmation(
        &self,
        to: &Email,
        username: &str,
        base_url: &str,
        token: &str,
    ) -> Result<(), ServiceError>;
}

/// Mailer that writes the message to the log instead of an SMTP server
pub struct LogMailer {
    from: String,
    server: String,
}

impl LogMailer {
    pub fn new(settings: &MailSettings) -> Self {
        Self {
            from: settings.from.clone(),
            server: format!("{}:{}", settings.server, settings.port),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_confirmation(
        &self,
        to: &Email,
        username: &str,
        base_url: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            from = %self.from,
            server = %self.server,
            to = %to,
            username,
            link = %confirmation_link(base_url, token),
            "Confirm your email"
        );
        Ok(())
    }
}
