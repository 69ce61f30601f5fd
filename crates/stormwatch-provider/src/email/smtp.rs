//! SMTP relay sender built on lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use stormwatch_core::config::messaging::SmtpConfig;
use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{EmailMessage, EmailSender};

/// Sends mail through a STARTTLS relay.
#[derive(Clone)]
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpEmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpEmailSender")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpEmailSender {
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let from_address = if config.from_address.is_empty() {
            &config.username
        } else {
            &config.from_address
        };
        let from = from_address.parse::<Mailbox>().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid SMTP from address '{from_address}'"),
                e,
            )
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid SMTP relay host", e)
            })?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .build();

        Ok(Self { transport, from })
    }

    fn build(&self, message: &EmailMessage) -> AppResult<Message> {
        let to = message.to.parse::<Mailbox>().map_err(|e| {
            AppError::with_source(
                ErrorKind::Messaging,
                format!("Invalid recipient '{}'", message.to),
                e,
            )
        })?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone());

        let built = match &message.html {
            Some(html) => builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.clone()),
                    ),
            ),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.text.clone()),
        };

        built.map_err(|e| AppError::with_source(ErrorKind::Messaging, "Failed to build email", e))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let email = self.build(message)?;
        self.transport.send(email).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Messaging,
                format!("SMTP delivery to {} failed", message.to),
                e,
            )
        })?;
        debug!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}
