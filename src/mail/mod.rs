//! SMTP mail client implementation

pub mod client;
pub mod compose;
pub mod config;
pub mod error;
pub mod request;
pub mod transport;

pub use client::{Delivery, MailClient};
pub use compose::{ComposedMessage, compose};
pub use config::{ConfigVars, SmtpConfig};
pub use error::{ComposeError, ComposeWarning, ConfigError, SendError, SendStage};
pub use request::{InlineImage, MailRequest};
pub use transport::{Connection, SessionGuard, SmtpConnector, SmtpSession, Transport};
