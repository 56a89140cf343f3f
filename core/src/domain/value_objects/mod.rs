//! Value objects representing immutable domain concepts.

pub mod token_pair_response;

pub use token_pair_response::TokenPairResponse;
