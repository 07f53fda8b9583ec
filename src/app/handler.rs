//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only entry point that mutates a [`FeedState`]. It
//! pattern-matches the event, updates the selection or the page cursor, and
//! returns the actions the session must execute.
//!
//! # Event Types
//!
//! - **Selection**: `SearchCommitted`, `CategoryChanged`, `FiltersApplied`,
//!   `FiltersReset`, `FilterCleared`, `Start` (all replace triggers)
//! - **Scrolling**: `ScrollNearEnd`, `ScrollRetreated`, `Scrolled`
//! - **Worker**: `FetchCompleted` with a generation-tagged reply
//!
//! # Example
//!
//! ```
//! use pixfeed::app::{handle_event, Event, FeedState};
//!
//! let mut state = FeedState::new();
//! let (changed, actions) = handle_event(&mut state, &Event::SearchCommitted("cat".into()))?;
//! assert!(changed);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), pixfeed::FeedError>(())
//! ```

use super::state::ReplyOutcome;
use super::{Action, FeedState};
use crate::domain::{Facets, Result};
use crate::input::ScrollMetrics;
use crate::worker::FetchReply;

/// Shortest search term, in characters, that issues a query.
pub const MIN_SEARCH_CHARS: usize = 3;

/// Inputs to the feed controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The feed was opened; loads page 1 of the current selection.
    Start,

    /// The debounced search box committed a term.
    ///
    /// An empty term clears the search; terms shorter than
    /// [`MIN_SEARCH_CHARS`] are ignored.
    SearchCommitted(String),

    /// A category was selected, or cleared with `None`.
    CategoryChanged(Option<String>),

    /// A facet set was applied from the filter panel.
    FiltersApplied(Facets),

    /// All facets were removed.
    FiltersReset,

    /// One facet chip was dismissed.
    FilterCleared(String),

    /// The list reached its near-end threshold.
    ScrollNearEnd,

    /// The list moved back above its near-end threshold.
    ScrollRetreated,

    /// A raw scroll position report, classified against the latch.
    Scrolled(ScrollMetrics),

    /// The worker finished a query.
    FetchCompleted(FetchReply),
}

/// Processes an event, mutates feed state, and returns actions to execute.
///
/// The returned bool reports whether observable state changed and a
/// re-render is due.
///
/// # Errors
///
/// Returns [`FeedError::Worker`](crate::FeedError::Worker) for a reply whose
/// generation was never issued. State is left untouched in that case.
pub fn handle_event(state: &mut FeedState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::Start => Ok(replace(state)),

        Event::SearchCommitted(term) => {
            if term.is_empty() {
                tracing::debug!("search cleared");
                state.search_term = None;
                return Ok(replace(state));
            }
            let length = term.chars().count();
            if length < MIN_SEARCH_CHARS {
                tracing::debug!(length, "search term too short, ignoring");
                return Ok((false, vec![]));
            }
            tracing::debug!(term = %term, "search committed");
            state.search_term = Some(term.clone());
            state.filters.set_category(None);
            Ok(replace(state))
        }

        Event::CategoryChanged(category) => {
            tracing::debug!(category = ?category, "category changed");
            state.filters.set_category(category.clone());
            state.search_term = None;
            Ok(replace(state))
        }

        Event::FiltersApplied(facets) => {
            if facets.is_empty() {
                tracing::debug!("empty facet set, ignoring");
                return Ok((false, vec![]));
            }
            tracing::debug!(facets = ?facets, "filters applied");
            state.filters.apply_facets(facets.clone());
            Ok(replace(state))
        }

        Event::FiltersReset => {
            let removed = state.filters.reset_facets();
            tracing::debug!(removed, "filters reset");
            Ok(replace(state))
        }

        Event::FilterCleared(name) => {
            let previous = state.filters.clear_facet(name);
            tracing::debug!(facet = %name, previous = ?previous, "filter cleared");
            Ok(replace(state))
        }

        Event::ScrollNearEnd => Ok(state
            .begin_append()
            .map_or((false, vec![]), |request| (true, vec![Action::Fetch(request)]))),

        Event::ScrollRetreated => {
            let released = state.release_latch();
            if released {
                tracing::trace!("latch released");
            }
            Ok((released, vec![]))
        }

        Event::Scrolled(metrics) => {
            let near_end = metrics.is_near_end();
            if near_end && !state.end_reached {
                handle_event(state, &Event::ScrollNearEnd)
            } else if !near_end && state.end_reached {
                handle_event(state, &Event::ScrollRetreated)
            } else {
                Ok((false, vec![]))
            }
        }

        Event::FetchCompleted(reply) => match state.apply_reply(reply)? {
            ReplyOutcome::Stale => Ok((true, vec![])),
            ReplyOutcome::Failed(failure) => {
                tracing::warn!(
                    generation = reply.generation,
                    mode = %reply.mode,
                    error = %failure,
                    "fetch failed"
                );
                Ok((
                    true,
                    vec![Action::ReportFailure {
                        mode: reply.mode,
                        message: failure.to_string(),
                    }],
                ))
            }
            ReplyOutcome::Replaced { .. }
            | ReplyOutcome::Appended { .. }
            | ReplyOutcome::Exhausted => Ok((true, vec![])),
        },
    }
}

fn replace(state: &mut FeedState) -> (bool, Vec<Action>) {
    (true, vec![Action::Fetch(state.begin_replace())])
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Start => "start",
        Event::SearchCommitted(_) => "search_committed",
        Event::CategoryChanged(_) => "category_changed",
        Event::FiltersApplied(_) => "filters_applied",
        Event::FiltersReset => "filters_reset",
        Event::FilterCleared(_) => "filter_cleared",
        Event::ScrollNearEnd => "scroll_near_end",
        Event::ScrollRetreated => "scroll_retreated",
        Event::Scrolled(_) => "scrolled",
        Event::FetchCompleted(_) => "fetch_completed",
    }
}
