use std::fmt;

use thiserror::Error;

use crate::config::EnvironmentProvider;

const DEFAULT_DATABASE_URL: &str = "sqlite://estagiogo.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Setting '{setting_name}' has invalid format. Expected: {expected}, got: {actual}")]
    InvalidFormat {
        setting_name: String,
        expected: String,
        actual: String,
    },

    #[error("Setting '{setting_name}' must not be empty")]
    Empty { setting_name: String },
}

/// Infrastructure settings needed before the server can start
#[derive(Clone, PartialEq)]
pub struct ServerSettings {
    database_url: String,
    host: String,
    port: u16,
}

impl ServerSettings {
    /// Load settings from the environment, falling back to defaults
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SettingsError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(SettingsError::Empty {
                setting_name: "DATABASE_URL".to_string(),
            });
        }

        let host = env.get_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        if host.trim().is_empty() {
            return Err(SettingsError::Empty {
                setting_name: "HOST".to_string(),
            });
        }

        let port = match env.get_var("PORT") {
            Some(raw) => Self::parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    fn parse_port(raw: &str) -> Result<u16, SettingsError> {
        match raw.trim().parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(SettingsError::InvalidFormat {
                setting_name: "PORT".to_string(),
                expected: "integer between 1 and 65535".to_string(),
                actual: raw.to_string(),
            }),
        }
    }

    /// Apply CLI overrides on top of the environment
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
