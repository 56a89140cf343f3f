//! Configuration module
//!
//! - `auth` - Signing keys, token lifetimes and refresh-token pepper
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    ///
    /// Reads the environment-specific `.env` file first, then the plain `.env`
    /// file; variables already set in the process environment win.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        Self {
            environment,
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Validate the parts of the configuration that cannot be defaulted safely
    pub fn validate(&self) -> Result<(), String> {
        self.auth.jwt.validate()?;
        if self.environment.is_production() && self.auth.jwt.is_using_default_pepper() {
            return Err("REFRESH_TOKEN_PEPPER must be set in production".to_string());
        }
        Ok(())
    }
}
