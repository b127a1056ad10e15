//! Error types for environment construction, stepping and config loading

use thiserror::Error;

/// Errors raised by the environment core.
///
/// All of these are programmer or configuration errors: they are fatal to
/// the call that raised them and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid world state: {0}")]
    InvalidState(String),
    #[error("invalid action {0}: expected 0 (left) or 1 (right)")]
    InvalidAction(i64),
    #[error("sensor invariant violated: {0}")]
    SensorInvariantViolation(String),
    #[error("environment must be reset before stepping")]
    NotReset,
}

/// Errors raised while loading an [`EnvConfig`](crate::EnvConfig) from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] EnvError),
}
