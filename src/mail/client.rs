//! The mail client

use crate::mail::compose::compose;
use crate::mail::config::SmtpConfig;
use crate::mail::error::{ComposeWarning, ConfigError, SendError};
use crate::mail::request::{InlineImage, MailRequest};
use crate::mail::transport::{Connection, SessionGuard, SmtpConnector, Transport};

/// Report of a successful send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Number of envelope recipients the message went to
    pub recipients: usize,
    /// Problems recovered from while composing
    pub warnings: Vec<ComposeWarning>,
}

/// Composes messages and sends each over its own SMTP session
#[derive(Debug, Clone)]
pub struct MailClient<T = SmtpConnector> {
    config: SmtpConfig,
    transport: T,
}

impl MailClient<SmtpConnector> {
    /// Create a client, loading the configuration from the environment
    /// when none is given
    pub fn new(config: Option<SmtpConfig>) -> Result<Self, ConfigError> {
        let config = match config {
            Some(config) => config,
            None => SmtpConfig::from_env()?,
        };

        Ok(Self::with_transport(config, SmtpConnector::default()))
    }
}

impl<T: Transport> MailClient<T> {
    /// Create a client that opens connections through `transport`
    pub fn with_transport(config: SmtpConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    /// Compose and send a message
    ///
    /// The outcome is logged either way: `info` on success, `error` with
    /// the server's original failure text otherwise. Nothing is retried.
    pub fn send(&self, request: &MailRequest) -> Result<Delivery, SendError> {
        match self.deliver(request) {
            Ok(delivery) => {
                log::info!(
                    "Email sent successfully to {} recipient(s)",
                    delivery.recipients
                );
                Ok(delivery)
            }
            Err(e) => {
                log::error!("Error sending email: {e}");
                Err(e)
            }
        }
    }

    /// Field-by-field form of [`send`](Self::send)
    pub fn send_email(
        &self,
        subject: &str,
        sender: &str,
        recipients: &[&str],
        text_body: Option<&str>,
        html_body: Option<&str>,
        inline_images: &[InlineImage],
    ) -> Result<Delivery, SendError> {
        let request = MailRequest {
            subject: subject.to_owned(),
            sender: sender.to_owned(),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            text_body: text_body.map(str::to_owned),
            html_body: html_body.map(str::to_owned),
            inline_images: inline_images.to_vec(),
        };

        self.send(&request)
    }

    fn deliver(&self, request: &MailRequest) -> Result<Delivery, SendError> {
        let composed = compose(request)?;
        let host = self.config.host();

        let mut session = SessionGuard::new(self.transport.connect(host, self.config.port())?);

        if self.config.use_tls() {
            session.starttls(host)?;
        }

        session.login(self.config.username(), self.config.password())?;
        session.send(&composed.envelope, &composed.formatted())?;

        Ok(Delivery {
            recipients: composed.envelope.to().len(),
            warnings: composed.warnings,
        })
    }
}
