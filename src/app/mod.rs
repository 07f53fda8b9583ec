//! Application layer: the feed state controller.
//!
//! This layer sits between the session runtime and the domain/worker
//! layers. It owns no I/O; every side effect leaves as an [`Action`].
//!
//! ```text
//! Input → Event → handle_event → FeedState mutation → Actions → worker
//!                      ↑                                          ↓
//!                      └──────────── FetchCompleted ──────────────┘
//! ```
//!
//! - [`actions`]: side effect commands emitted by the handler
//! - [`filters`]: category and facet selection
//! - [`handler`]: event processing and state transitions
//! - [`modes`]: replace/append fetch mode
//! - [`state`]: feed state container and request sequencing

pub mod actions;
pub mod filters;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use filters::FilterState;
pub use handler::{handle_event, Event, MIN_SEARCH_CHARS};
pub use modes::FetchMode;
pub use state::{FeedState, ReplyOutcome};
