//! Error types for the zlistings plugin.
//!
//! This module defines the centralized error type [`ListingsError`] and a type
//! alias [`Result`] used throughout the crate. Errors are implemented with the
//! `thiserror` crate. Query failures are cloneable so a single failed fetch can
//! be handed to every caller that was waiting on it.

use std::sync::Arc;
use thiserror::Error;

/// The main error type for zlistings operations.
///
/// The first three variants classify query failures and decide retry
/// behavior in the data store: only [`ListingsError::NetworkTransient`] is
/// retried.
///
/// # Examples
///
/// ```
/// use zlistings::ListingsError;
///
/// let err = ListingsError::NotFound(42);
/// assert!(!err.is_retryable());
/// assert_eq!(err.to_string(), "Listing 42 not found");
/// ```
#[derive(Debug, Clone, Error)]
pub enum ListingsError {
    /// Transport failure, timeout or server-side hiccup.
    ///
    /// Retried automatically by the store before being surfaced.
    #[error("Network error: {0}")]
    NetworkTransient(String),

    /// A single-listing lookup returned an empty page.
    #[error("Listing {0} not found")]
    NotFound(i64),

    /// The request parameters were rejected or the response did not have the
    /// expected shape.
    #[error("Malformed query or response: {0}")]
    Malformed(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),
}

impl ListingsError {
    /// Returns `true` if the failure is transient and worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkTransient(_))
    }

    /// Short, user-facing label used by the presentation layer.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NetworkTransient(_) => "network",
            Self::NotFound(_) => "not found",
            Self::Malformed(_) => "malformed",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Theme(_) => "theme",
        }
    }
}

impl From<std::io::Error> for ListingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// A specialized `Result` type for zlistings operations.
pub type Result<T> = std::result::Result<T, ListingsError>;
