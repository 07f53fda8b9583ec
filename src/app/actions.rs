//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never performs I/O itself. It
//! returns a `Vec<Action>` which the [`FeedSession`](crate::FeedSession)
//! executes in order: fetches go to the worker, failure reports become
//! user-visible notices.

use super::FetchMode;
use crate::worker::FetchRequest;

/// Commands executed by the session after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hands a query to the fetch worker.
    Fetch(FetchRequest),

    /// Surfaces a failed query to the user.
    ///
    /// Emitted once per failed, non-stale reply. There is no automatic retry.
    ReportFailure {
        /// Mode of the query that failed.
        mode: FetchMode,
        /// Human-readable failure description.
        message: String,
    },
}

impl Action {
    /// The fetch request carried by this action, if any.
    #[must_use]
    pub const fn as_fetch(&self) -> Option<&FetchRequest> {
        match self {
            Self::Fetch(request) => Some(request),
            Self::ReportFailure { .. } => None,
        }
    }
}
