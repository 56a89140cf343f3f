//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and migrations
//! - Refresh-token store and user lookup over MySQL

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlRefreshTokenRepository, MySqlUserRepository};
