//! Error types for the mail client

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading [`SmtpConfig`](crate::SmtpConfig)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid SMTP port {value:?}: {reason}")]
    InvalidPort { value: String, reason: String },
}

/// Errors that prevent a message from being composed at all
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("At least one recipient is required")]
    NoRecipients,

    #[error("Failed to build message: {0}")]
    Build(String),
}

/// Problems the composer recovered from on its own
///
/// None of these abort a send. They are logged as they occur and handed
/// back to the caller in the [`Delivery`](crate::Delivery) report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeWarning {
    #[error("No text or HTML body supplied, sending an empty text body")]
    EmptyBody,

    #[error("Inline image {content_id:?} skipped, could not read {}: {reason}", path.display())]
    MissingImage {
        content_id: String,
        path: PathBuf,
        reason: String,
    },
}

/// The step of an SMTP session that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStage {
    Compose,
    Connect,
    StartTls,
    Login,
    Transmit,
}

/// Errors returned by [`MailClient::send`](crate::MailClient::send)
#[derive(Error, Debug)]
pub enum SendError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error("Could not connect to {host}:{port}: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("STARTTLS negotiation failed: {0}")]
    StartTls(String),

    #[error("Authentication failed: {0}")]
    Login(String),

    #[error("Transmission failed: {0}")]
    Transmit(String),
}

impl SendError {
    /// Maps the error to the session step it came from
    pub fn stage(&self) -> SendStage {
        match self {
            SendError::Compose(_) => SendStage::Compose,
            SendError::Connect { .. } => SendStage::Connect,
            SendError::StartTls(_) => SendStage::StartTls,
            SendError::Login(_) => SendStage::Login,
            SendError::Transmit(_) => SendStage::Transmit,
        }
    }
}
