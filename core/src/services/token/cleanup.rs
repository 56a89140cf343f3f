//! Retention cleanup for refresh-token records
//!
//! Dead records (expired or revoked) are kept for a grace period, then deleted
//! by a periodic background task.

use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::RefreshTokenRepository;

use super::clock::{Clock, SystemClock};

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// How long dead records are kept before deletion (in days)
    pub grace_period_days: i64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            grace_period_days: 7,
            enabled: true,
        }
    }
}

/// Service for deleting dead refresh-token records
pub struct TokenCleanupService<R: RefreshTokenRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: TokenCleanupConfig,
}

impl<R: RefreshTokenRepository> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(repository: Arc<R>, config: TokenCleanupConfig) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of cleanup operations; store failures are recorded in it
    /// * `Err(DomainError)` - Reserved for failures outside the store
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let cutoff = self.clock.now() - Duration::days(self.config.grace_period_days);
        let mut result = CleanupResult::default();

        match self.repository.delete_dead_before(cutoff).await {
            Ok(count) => {
                result.dead_tokens_deleted = count;
                info!(deleted = count, cutoff = %cutoff, "Refresh token cleanup completed");
            }
            Err(e) => {
                error!("Failed to cleanup refresh tokens: {}", e);
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) if !result.is_success() => {
                        warn!("Cleanup completed with errors: {:?}", result.errors);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired or revoked records deleted
    pub dead_tokens_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
