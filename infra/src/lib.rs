//! # Infrastructure Layer
//!
//! Concrete I/O for the EduSuite token lifecycle: the MySQL connection pool,
//! MySQL implementations of the refresh-token store and user lookup, and
//! [`bootstrap`], which wires configuration into a ready token manager.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::sync::Arc;

use edu_core::errors::{DomainError, TokenError};
use edu_core::services::token::{
    JwtSigner, JwtTokenManager, PepperedSha512Hasher, Rs256KeyManager, TokenCleanupConfig,
    TokenCleanupService, TokenManagerConfig,
};
use edu_shared::config::AppConfig;
use edu_shared::telemetry::init_tracing;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlRefreshTokenRepository, MySqlUserRepository, PoolStatistics};

/// Token manager over the MySQL stores
#[cfg(feature = "mysql")]
pub type MySqlTokenManager = JwtTokenManager<MySqlRefreshTokenRepository, MySqlUserRepository>;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Signing keys could not be loaded
    #[error("Key error: {0}")]
    Key(#[from] TokenError),
}

impl From<DomainError> for InfrastructureError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Token(token) => InfrastructureError::Key(token),
            other => InfrastructureError::Config(other.to_string()),
        }
    }
}

/// Everything a host process needs to serve token requests
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub database: DatabasePool,
    pub signer: Arc<JwtSigner>,
    pub token_manager: Arc<MySqlTokenManager>,
    pub cleanup: Arc<TokenCleanupService<MySqlRefreshTokenRepository>>,
}

/// Signing keys named by the configuration
pub fn load_signer(config: &AppConfig) -> Result<JwtSigner, InfrastructureError> {
    let jwt = &config.auth.jwt;
    let keys = Rs256KeyManager::from_files(
        &jwt.private_key_path,
        jwt.public_key_path.as_ref(),
        jwt.private_key_passphrase.as_deref(),
    )?;

    tracing::info!(?keys, "RS256 signing keys loaded");
    Ok(JwtSigner::new(keys, jwt.issuer.clone(), jwt.audience.clone()))
}

/// Initialise logging, load keys, connect to MySQL and build the token services
///
/// Keys are loaded before the pool is opened, so a bad key path fails fast.
/// Migrations are not run here; call [`DatabasePool::run_migrations`].
///
/// # Arguments
/// * `config` - Application configuration, usually from `AppConfig::from_env()`
///
/// # Returns
/// * `Ok(AppServices)` - Wired services
/// * `Err(InfrastructureError)` - Invalid configuration, unreadable keys or unreachable database
#[cfg(feature = "mysql")]
pub async fn bootstrap(config: AppConfig) -> Result<AppServices, InfrastructureError> {
    init_tracing(&config.logging);
    tracing::info!(environment = %config.environment, "Initializing infrastructure services");

    config.validate().map_err(InfrastructureError::Config)?;
    if config.auth.jwt.is_using_default_pepper() {
        tracing::warn!("Refresh tokens are hashed with the default development pepper");
    }

    let signer = Arc::new(load_signer(&config)?);
    let hasher = Arc::new(PepperedSha512Hasher::new(
        config.auth.jwt.refresh_token_pepper.clone(),
    ));
    let manager_config = TokenManagerConfig::from_jwt_config(&config.auth.jwt)?;

    let database = DatabasePool::new(config.database.clone()).await?;
    let tokens = Arc::new(MySqlRefreshTokenRepository::new(database.get_pool().clone()));
    let users = Arc::new(MySqlUserRepository::new(database.get_pool().clone()));

    let token_manager = Arc::new(JwtTokenManager::new(
        tokens.clone(),
        users,
        signer.clone(),
        hasher,
        manager_config,
    )?);
    let cleanup = Arc::new(TokenCleanupService::new(tokens, TokenCleanupConfig::default()));

    tracing::info!(
        stats = %database.get_statistics(),
        "Infrastructure services initialized successfully"
    );

    Ok(AppServices {
        config,
        database,
        signer,
        token_manager,
        cleanup,
    })
}
