//! Error types for lotto-draw
//!
//! This module provides error handling for the library, including:
//! - Per-source failures that are recovered locally by moving on to the next source
//! - The aggregate refresh failure surfaced to the caller when every source is unusable
//! - Crate-level errors for configuration, weight construction and I/O

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for lotto-draw operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lotto-draw
///
/// Refresh and generate never return this type: refresh failures are folded into
/// [`RefreshFailure`] and sampling cannot fail. It is produced by construction-time
/// operations (loading config, building the engine, building custom weight maps).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "sources")
        key: Option<String>,
    },

    /// HTTP client could not be constructed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A weight map violated the full-coverage or positive-weight invariant
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// A draw was built from repeated or out-of-domain numbers
    #[error("invalid draw: {0}")]
    InvalidDraw(String),

    /// Every configured source was unusable
    #[error("{0}")]
    Refresh(#[from] RefreshFailure),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Failure of a single source during a refresh
///
/// Each variant is recovered locally: the refresh flow records it and moves on
/// to the next configured source.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SourceError {
    /// Timeout, connection refused, non-2xx status or unreadable body
    #[error("transport error: {0}")]
    Transport(String),

    /// No table on the page passed the table selector
    #[error("no matching table found")]
    NoMatchingTable,

    /// The page could not be turned into tabular content
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The selected table held too few valid numbers to be meaningful
    #[error("insufficient sample: found {found} valid numbers, need at least {required}")]
    InsufficientSample {
        /// Number of valid numbers extracted
        found: usize,
        /// Minimum required by configuration
        required: usize,
    },
}

impl SourceError {
    /// Returns true if the source never produced a body (network level failure)
    pub fn is_transport(&self) -> bool {
        matches!(self, SourceError::Transport(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Transport(format!("request timed out: {}", e))
        } else if e.is_connect() {
            SourceError::Transport(format!("connection failed: {}", e))
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

/// Diagnostic line for one attempted source
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceDiagnostic {
    /// The source URL that was attempted
    pub source: String,
    /// Why the source was rejected
    pub error: SourceError,
}

impl fmt::Display for SourceDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// Aggregate failure when every configured source was unusable
///
/// Displays as one diagnostic line per attempted source, in attempt order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RefreshFailure {
    /// One entry per attempted source
    pub diagnostics: Vec<SourceDiagnostic>,
}

impl RefreshFailure {
    /// Number of sources that were attempted
    pub fn attempted(&self) -> usize {
        self.diagnostics.len()
    }
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return write!(f, "no sources attempted");
        }
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for RefreshFailure {}
