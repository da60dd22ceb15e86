use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::account::errors::EmailDeliveryError;
use crate::account::ports::EmailSender;
use crate::config::SmtpConfig;

/// SMTP-backed implementation of the email delivery capability.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpEmailSender {
    /// Build a pooled SMTP transport from configuration.
    ///
    /// # Errors
    /// * `InvalidMessage` - Configured sender address is malformed
    /// * `Transport` - Relay configuration failed
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailDeliveryError> {
        let sender = config
            .sender
            .parse::<Mailbox>()
            .map_err(|e| EmailDeliveryError::InvalidMessage(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| EmailDeliveryError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, sender })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailDeliveryError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(to
                .parse::<Mailbox>()
                .map_err(|e| EmailDeliveryError::InvalidMessage(e.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailDeliveryError::InvalidMessage(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| EmailDeliveryError::Transport(e.to_string()))?;

        Ok(())
    }
}
