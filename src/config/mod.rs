mod database;
mod env_provider;
mod logging;
mod secret_config;
mod secret_manager;
mod server_settings;

pub use database::{connect, migrate};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager};
pub use server_settings::{ServerSettings, SettingsError};
