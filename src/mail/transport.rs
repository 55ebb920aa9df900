//! SMTP session steps
//!
//! A send is one linear session: connect, optionally upgrade with STARTTLS,
//! authenticate, transmit, close. [`Transport`] and [`Connection`] expose
//! exactly those steps so the client can drive them in order and tests can
//! observe them. [`SmtpConnector`] is the real implementation on top of
//! lettre's low-level [`SmtpConnection`].

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;

use crate::mail::error::SendError;

/// Socket timeout applied to connect and every command round trip
pub const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(60);

/// Mechanisms offered to the server, in order of preference
pub const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// Opens SMTP connections
pub trait Transport {
    type Connection: Connection;

    fn connect(&self, host: &str, port: u16) -> Result<Self::Connection, SendError>;
}

/// An open SMTP connection
pub trait Connection {
    /// Upgrade the connection to TLS, verifying the certificate for `host`
    fn starttls(&mut self, host: &str) -> Result<(), SendError>;

    fn login(&mut self, username: &str, password: &str) -> Result<(), SendError>;

    /// Transmit one message to every forward path of the envelope
    fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<(), SendError>;

    /// End the session. Must not fail.
    fn close(&mut self);
}

/// Closes the wrapped connection when dropped
pub struct SessionGuard<C: Connection> {
    connection: C,
}

impl<C: Connection> SessionGuard<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }
}

impl<C: Connection> Deref for SessionGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.connection
    }
}

impl<C: Connection> DerefMut for SessionGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.connection
    }
}

impl<C: Connection> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        self.connection.close();
    }
}

/// Plain TCP SMTP connector backed by lettre
#[derive(Debug, Clone)]
pub struct SmtpConnector {
    hello_name: ClientId,
    timeout: Option<Duration>,
}

impl SmtpConnector {
    pub fn new() -> Self {
        Self {
            hello_name: ClientId::default(),
            timeout: Some(TRANSPORT_TIMEOUT),
        }
    }

    /// Override the name sent with EHLO
    pub fn hello_name(mut self, name: ClientId) -> Self {
        self.hello_name = name;
        self
    }
}

impl Default for SmtpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SmtpConnector {
    type Connection = SmtpSession;

    fn connect(&self, host: &str, port: u16) -> Result<SmtpSession, SendError> {
        log::debug!("Connecting to {host}:{port}");

        let inner = SmtpConnection::connect((host, port), self.timeout, &self.hello_name, None, None)
            .map_err(|e| SendError::Connect {
                host: host.to_owned(),
                port,
                reason: e.to_string(),
            })?;

        Ok(SmtpSession {
            inner,
            hello_name: self.hello_name.clone(),
        })
    }
}

/// A live connection opened by [`SmtpConnector`]
pub struct SmtpSession {
    inner: SmtpConnection,
    hello_name: ClientId,
}

impl Connection for SmtpSession {
    fn starttls(&mut self, host: &str) -> Result<(), SendError> {
        let parameters =
            TlsParameters::new(host.to_owned()).map_err(|e| SendError::StartTls(e.to_string()))?;

        self.inner
            .starttls(&parameters, &self.hello_name)
            .map_err(|e| SendError::StartTls(e.to_string()))?;

        log::debug!("STARTTLS negotiated with {host}");
        Ok(())
    }

    fn login(&mut self, username: &str, password: &str) -> Result<(), SendError> {
        let credentials = Credentials::new(username.to_owned(), password.to_owned());

        self.inner
            .auth(AUTH_MECHANISMS, &credentials)
            .map_err(|e| SendError::Login(e.to_string()))?;

        log::debug!("Authenticated as {username}");
        Ok(())
    }

    fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<(), SendError> {
        let response = self
            .inner
            .send(envelope, message)
            .map_err(|e| SendError::Transmit(e.to_string()))?;

        log::debug!("Message accepted: {}", response.code());
        Ok(())
    }

    fn close(&mut self) {
        if let Err(e) = self.inner.quit() {
            log::debug!("QUIT failed, dropping connection: {e}");
        }
    }
}
