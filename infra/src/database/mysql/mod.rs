//! MySQL implementations of the core repository traits

mod refresh_token_repository_impl;
mod user_repository_impl;

pub use refresh_token_repository_impl::MySqlRefreshTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use edu_core::errors::DomainError;

/// Maps a SQLx failure into the domain's infrastructure error
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}
