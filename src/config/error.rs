//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::ranking::ThresholdError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric variable held something other than a number.
    #[error("invalid value for {name}: '{value}' is not a number")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid similarity thresholds: {0}")]
    InvalidThresholds(#[from] ThresholdError),

    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },

    #[error("embedding dimension must be greater than zero")]
    ZeroDimension,

    /// A URL setting does not use an http(s) scheme.
    #[error("invalid URL for {name}: '{value}'")]
    InvalidUrl { name: &'static str, value: String },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
