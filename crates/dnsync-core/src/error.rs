//! Error types for the DNSync system
//!
//! This module defines all error types used throughout the crate.
//!
//! Nothing in the engine retries or suppresses these errors. They propagate
//! to the caller of `records()`/`apply_changes()`, which decides whether to
//! rerun the whole pass.

use crate::plan::Mutation;
use thiserror::Error;

/// Result type alias for DNSync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNSync system
#[derive(Error, Debug)]
pub enum Error {
    /// Network or connection failure, including request timeouts
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded into the expected shape,
    /// or the provider answered with an unexpected status
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Referenced zone or record ID does not exist at the provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// A desired endpoint has no matching record in the current state
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// No hosted zone is a suffix of the endpoint's DNS name
    #[error("No zone found for {0}")]
    ZoneNotFound(String),

    /// Several records share the endpoint's (name, type) key and its
    /// targets do not single them out
    #[error("Ambiguous record: {0}")]
    AmbiguousRecord(String),

    /// Some mutations committed before a later one failed
    #[error(
        "Partial apply: {} mutation(s) committed before `{failed_at}` failed: {source}",
        committed.len()
    )]
    PartialApply {
        /// Mutations the provider accepted, in issue order
        committed: Vec<Mutation>,
        /// The mutation that failed
        failed_at: Mutation,
        /// The failure reported for `failed_at`
        source: Box<Error>,
    },

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a "zone not found" error for a DNS name
    pub fn zone_not_found(dns_name: impl Into<String>) -> Self {
        Self::ZoneNotFound(dns_name.into())
    }

    /// Create an ambiguous record error
    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Self::AmbiguousRecord(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors raised while matching desired endpoints against
    /// current state, before any mutation was attempted.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::Resolution(_) | Self::ZoneNotFound(_) | Self::AmbiguousRecord(_)
        )
    }
}
