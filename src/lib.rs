//! # Hagaki
//!
//! Hagaki composes multipart email (plain text, HTML and inline images) and
//! sends it over SMTP.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hagaki::{MailClient, MailRequest};
//!
//! // Settings come from SMTP_* environment variables (or a .env file)
//! let client = MailClient::new(None)?;
//!
//! let request = MailRequest::new("Monthly report", "reports@example.com", ["team@example.com"])
//!     .text("The report is attached inline.")
//!     .html("<p>The report:</p><img src=\"cid:chart\">")
//!     .inline_image("chart", "chart.png");
//!
//! match client.send(&request) {
//!     Ok(delivery) => println!("sent, {} warning(s)", delivery.warnings.len()),
//!     Err(e) => eprintln!("not sent: {e}"),
//! }
//! # Ok::<(), hagaki::ConfigError>(())
//! ```
//!
//! ## Configuration
//!
//! [`SmtpConfig::from_env`] reads:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SMTP_HOST_SERVER` | `smtp.example.com` |
//! | `SMTP_PORT` | `587` |
//! | `SMTP_USERNAME` | `<username>` |
//! | `SMTP_PASSWORD` | `<password>` |
//! | `SMTP_USE_TLS` | `true` (`true`, `1` or `yes` in any case) |
//!
//! A port that is not a number fails the load with [`ConfigError`].
//!
//! ## Message Layout
//!
//! The root part is `multipart/related`. It holds a `multipart/alternative`
//! with the text and/or HTML body, followed by one inline part per image
//! carrying `Content-ID: <id>` and `Content-Disposition: inline`.
//!
//! - With no body at all, an empty `text/plain` part is sent.
//! - An inline image whose file cannot be read is skipped.
//!
//! Both cases are logged and returned as [`ComposeWarning`]s in the
//! [`Delivery`] report.
//!
//! ## Session
//!
//! Each send runs one blocking session: connect, STARTTLS when `use_tls`
//! is set, AUTH, MAIL/RCPT/DATA, QUIT. The connection is closed on every
//! path once it has been opened. SMTP failures are logged and returned as
//! [`SendError`]; they are never retried.
//!
//! ## Logging
//!
//! Hagaki logs through the [`log`] facade and never installs a logger.

mod mail;

pub use mail::{
    ComposeError, ComposeWarning, ComposedMessage, ConfigError, ConfigVars, Connection, Delivery,
    InlineImage, MailClient, MailRequest, SendError, SendStage, SessionGuard, SmtpConfig,
    SmtpConnector, SmtpSession, Transport, compose,
};
