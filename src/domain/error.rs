//! Error types for the feed controller.
//!
//! [`FetchFailure`] describes why a single remote query produced no page. It
//! is cheap to clone because it travels inside worker replies. [`FeedError`]
//! is the crate-wide error returned from fallible operations, with [`Result`]
//! as the matching alias.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a remote query did not yield a result page.
///
/// Both variants are recoverable: the controller keeps its last good state
/// and reports the failure to the caller for user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum FetchFailure {
    /// Network error, timeout, or a non-success HTTP status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body did not carry the expected result structure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// The main error type for feed operations.
///
/// # Examples
///
/// ```
/// use pixfeed::{FeedError, FetchFailure};
///
/// let err: FeedError = FetchFailure::Transport("connection reset".into()).into();
/// assert_eq!(err.to_string(), "fetch failed: transport failure: connection reset");
/// ```
#[derive(Debug, Error)]
pub enum FeedError {
    /// A remote query failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchFailure),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The fetch worker or its reply channel misbehaved, e.g. a reply arrived
    /// for a generation that was never issued.
    #[error("Worker error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
