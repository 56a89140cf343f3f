//! Shared configuration and common types for the EduSuite server
//!
//! - Configuration types loaded from the environment
//! - Error response structure and error codes
//! - Tracing subscriber setup

pub mod config;
pub mod errors;
pub mod telemetry;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
pub use telemetry::init_tracing;
