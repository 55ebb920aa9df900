//! SMTP connection settings

use std::env;

use crate::mail::error::ConfigError;

/// Environment variable names and their fallbacks
pub struct ConfigVars;

impl ConfigVars {
    pub const HOST: &'static str = "SMTP_HOST_SERVER";
    pub const PORT: &'static str = "SMTP_PORT";
    pub const USERNAME: &'static str = "SMTP_USERNAME";
    pub const PASSWORD: &'static str = "SMTP_PASSWORD";
    pub const USE_TLS: &'static str = "SMTP_USE_TLS";

    pub const DEFAULT_HOST: &'static str = "smtp.example.com";
    pub const DEFAULT_PORT: u16 = 587;
    pub const DEFAULT_USERNAME: &'static str = "<username>";
    pub const DEFAULT_PASSWORD: &'static str = "<password>";
    pub const DEFAULT_USE_TLS: bool = true;
}

/// Immutable SMTP settings for a [`MailClient`](crate::MailClient)
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
    use_tls: bool,
}

impl SmtpConfig {
    /// Create a configuration from explicit values
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        use_tls: bool,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            use_tls,
        }
    }

    /// Load settings from the process environment
    ///
    /// A `.env` file in the working directory (or any parent) is read first
    /// when present. Variables already set in the environment win.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ConfigVars::HOST).unwrap_or_else(|| ConfigVars::DEFAULT_HOST.to_owned());

        let port = match lookup(ConfigVars::PORT) {
            Some(value) => parse_port(&value)?,
            None => ConfigVars::DEFAULT_PORT,
        };

        let username =
            lookup(ConfigVars::USERNAME).unwrap_or_else(|| ConfigVars::DEFAULT_USERNAME.to_owned());
        let password =
            lookup(ConfigVars::PASSWORD).unwrap_or_else(|| ConfigVars::DEFAULT_PASSWORD.to_owned());

        let use_tls = lookup(ConfigVars::USE_TLS)
            .map(|value| parse_flag(&value))
            .unwrap_or(ConfigVars::DEFAULT_USE_TLS);

        Ok(Self {
            host,
            port,
            username,
            password,
            use_tls,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether STARTTLS is issued before authenticating
    pub fn use_tls(&self) -> bool {
        self.use_tls
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self::new(
            ConfigVars::DEFAULT_HOST,
            ConfigVars::DEFAULT_PORT,
            ConfigVars::DEFAULT_USERNAME,
            ConfigVars::DEFAULT_PASSWORD,
            ConfigVars::DEFAULT_USE_TLS,
        )
    }
}

// Keeps the password out of log output.
impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidPort {
            value: value.to_owned(),
            reason: e.to_string(),
        })
}

/// `true`, `1` and `yes` in any case are true, everything else is false
fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
