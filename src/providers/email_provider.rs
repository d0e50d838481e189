use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

/// A message ready to hand to the email collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html_body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }

    /// Credentials for a freshly provisioned account
    pub fn account_created(to: &str, display_name: &str, temporary_password: &str) -> Self {
        Self::new(
            to,
            "Your EstagioGO account",
            format!(
                "<p>Hello {},</p><p>An account was created for you. Sign in with this temporary \
                 password and choose a new one on first access:</p><p><code>{}</code></p>",
                html_escape(display_name),
                html_escape(temporary_password)
            ),
        )
    }

    /// Temporary password issued by an administrator reset
    pub fn password_reset_by_admin(to: &str, display_name: &str, temporary_password: &str) -> Self {
        Self::new(
            to,
            "Your EstagioGO password was reset",
            format!(
                "<p>Hello {},</p><p>An administrator reset your password. Your temporary password \
                 is:</p><p><code>{}</code></p><p>You will be asked to change it when you sign in.</p>",
                html_escape(display_name),
                html_escape(temporary_password)
            ),
        )
    }

    /// Self-service reset token
    pub fn password_reset_requested(to: &str, display_name: &str, reset_token: &str) -> Self {
        Self::new(
            to,
            "Reset your EstagioGO password",
            format!(
                "<p>Hello {},</p><p>Use this code to reset your password. It expires in one \
                 hour:</p><p><code>{}</code></p><p>If you did not ask for this, ignore this email.</p>",
                html_escape(display_name),
                html_escape(reset_token)
            ),
        )
    }
}

/// Escape text for insertion into an HTML body
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Outbound email collaborator
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

/// Default sender: writes the message to the log instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Outbound email (logging sender, not delivered)"
        );
        tracing::debug!(
            to = %message.to,
            body_len = message.html_body.len(),
            "Email body withheld from logs"
        );
        Ok(())
    }
}

/// Sender that keeps every message in memory, for tests and local tooling
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> Vec<EmailMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Last message addressed to `to`
    pub fn last_to(&self, to: &str) -> Option<EmailMessage> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        match self.sent.lock() {
            Ok(mut sent) => sent.push(message.clone()),
            Err(poisoned) => poisoned.into_inner().push(message.clone()),
        }
        Ok(())
    }
}

/// Send on a background task; failures are logged, never returned
pub fn dispatch(sender: Arc<dyn EmailSender>, message: EmailMessage) {
    tokio::spawn(async move {
        if let Err(e) = sender.send(&message).await {
            tracing::error!(to = %message.to, subject = %message.subject, "Failed to send email: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FailingSender;

    #[async_trait]
    impl EmailSender for FailingSender {
        async fn send(&self, _message: &EmailMessage) -> Result<(), EmailError> {
            Err(EmailError::Delivery("smtp unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_recording_sender_keeps_messages() {
        let sender = RecordingEmailSender::new();

        sender.send(&EmailMessage::new("a@example.com", "one", "<p>1</p>")).await.unwrap();
        sender.send(&EmailMessage::new("b@example.com", "two", "<p>2</p>")).await.unwrap();

        assert_eq!(sender.sent().len(), 2);
        assert_eq!(sender.last_to("b@example.com").unwrap().subject, "two");
        assert!(sender.last_to("c@example.com").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_delivers_in_background() {
        let sender = Arc::new(RecordingEmailSender::new());

        dispatch(sender.clone(), EmailMessage::new("a@example.com", "hello", "<p>hi</p>"));

        for _ in 0..50 {
            if !sender.sent().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failures() {
        dispatch(Arc::new(FailingSender), EmailMessage::new("a@example.com", "s", "b"));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_logging_sender_always_succeeds() {
        let result = LoggingEmailSender
            .send(&EmailMessage::account_created("a@example.com", "Ana", "Temp#Pass1"))
            .await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_templates_include_secret() {
        let message = EmailMessage::password_reset_requested("a@example.com", "Ana", "reset-token-xyz");

        assert!(message.html_body.contains("reset-token-xyz"));
        assert!(message.html_body.contains("Ana"));
    }

    #[test]
    fn test_templates_escape_display_name() {
        let message = EmailMessage::account_created(
            "a@example.com",
            "<script>alert('x')</script> & Co",
            "Temp#Pass1",
        );

        assert!(!message.html_body.contains("<script>"));
        assert!(message
            .html_body
            .contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt; &amp; Co"));
    }

    #[test]
    fn test_templates_escape_secret_inside_code() {
        let message = EmailMessage::password_reset_by_admin("a@example.com", "Ana", "a&lt9<b");

        assert!(message.html_body.contains("<code>a&amp;lt9&lt;b</code>"));
    }
}
