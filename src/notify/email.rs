use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailConfig;

use super::batch::AlertBatch;
use super::dispatcher::{NotifyChannel, NotifyError};

/// SMTP mail submission. One message per batch, HTML body, every configured
/// recipient on the same message.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, batch: &AlertBatch) -> Result<Message, NotifyError> {
        let sender: Mailbox = self
            .config
            .sender
            .parse()
            .map_err(|error| NotifyError::Smtp(format!("invalid sender address: {}", error)))?;

        let mut builder = Message::builder()
            .from(sender)
            .subject(batch.subject())
            .header(ContentType::TEXT_HTML);
        for recipient in &self.config.recipients {
            let mailbox: Mailbox = recipient.parse().map_err(|error| {
                NotifyError::Smtp(format!("invalid recipient {}: {}", recipient, error))
            })?;
            builder = builder.to(mailbox);
        }

        builder
            .body(batch.render_html())
            .map_err(|error| NotifyError::Smtp(error.to_string()))
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let mut builder = if self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
                .map_err(|error| NotifyError::Smtp(error.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_server)
        };

        builder = builder.port(self.config.smtp_port);
        if !self.config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }
        Ok(builder.build())
    }
}

#[async_trait]
impl NotifyChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send_batch(&self, batch: &AlertBatch) -> Result<(), NotifyError> {
        let message = self.build_message(batch)?;
        let mailer = self.build_transport()?;

        mailer
            .send(message)
            .await
            .map_err(|error| NotifyError::Smtp(error.to_string()))?;

        log::info!(
            "email_batch_delivered recipients={} subject={:?}",
            self.config.recipients.len(),
            batch.subject()
        );
        Ok(())
    }
}
