//! Feed state: the accumulated items, the page cursor and request sequencing.
//!
//! [`FeedState`] is the single authority over what the next remote query
//! looks like. It is mutated only by [`handle_event`](super::handle_event)
//! and read through its getters or an owned [`snapshot`](FeedState::snapshot).
//!
//! # Request sequencing
//!
//! Every query gets a strictly increasing generation. A replace query also
//! becomes the *epoch*: any reply whose generation is below the epoch belongs
//! to a superseded selection and is dropped, whatever its mode. At most one
//! append is outstanding at a time; a replace can be outstanding alongside it.
//!
//! ```text
//! gen 1  replace (epoch 1) ──────────────▶ applied
//! gen 2  append  page 2    ────────▶ applied
//! gen 3  replace (epoch 3)
//! gen 2' ... late reply for gen 2 ───────▶ stale, dropped
//! ```

use super::filters::FilterState;
use super::FetchMode;
use crate::domain::{FeedError, FetchFailure, ImageItem, QueryParameters, Result};
use crate::ui::FeedViewModel;
use crate::worker::{FetchReply, FetchRequest};

/// What applying a fetch reply did to the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A page-1 reply became the whole item list.
    Replaced {
        /// Number of items now in the feed.
        count: usize,
    },

    /// A next-page reply was concatenated onto the tail.
    Appended {
        /// Number of items added.
        added: usize,
    },

    /// A next-page reply was empty; the latch stays set.
    Exhausted,

    /// The query failed; the items are unchanged.
    Failed(FetchFailure),

    /// The reply belongs to a superseded selection and was dropped.
    Stale,
}

/// Central feed state container.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Accumulated items in arrival order. Never deduplicated.
    pub(crate) items: Vec<ImageItem>,

    /// Last requested page, starting at 1.
    pub(crate) page: u32,

    /// Committed search term, mutually exclusive with a category.
    pub(crate) search_term: Option<String>,

    /// Category and facet selection.
    pub(crate) filters: FilterState,

    /// Near-end latch. Set when an append fires, cleared on retreat and on
    /// every replace.
    pub(crate) end_reached: bool,

    /// Last generation handed out.
    pub(crate) generation: u64,

    /// Generation of the latest replace query. Replies below it are stale.
    pub(crate) epoch: u64,

    /// Generation of the outstanding replace query.
    pub(crate) replace_in_flight: Option<u64>,

    /// Generation of the outstanding append query.
    pub(crate) append_in_flight: Option<u64>,

    /// Hits reported by the most recent applied reply.
    pub(crate) total_hits: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    /// Creates an empty feed at page 1 with no selection.
    ///
    /// # Example
    ///
    /// ```
    /// use pixfeed::app::FeedState;
    ///
    /// let state = FeedState::new();
    /// assert_eq!(state.page(), 1);
    /// assert!(state.items().is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            search_term: None,
            filters: FilterState::new(),
            end_reached: false,
            generation: 0,
            epoch: 0,
            replace_in_flight: None,
            append_in_flight: None,
            total_hits: 0,
        }
    }

    /// Accumulated items.
    #[must_use]
    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    /// Last requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Committed search term.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    /// Category and facet selection.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Whether the near-end latch is set.
    #[must_use]
    pub const fn end_reached(&self) -> bool {
        self.end_reached
    }

    /// Last generation handed out; 0 before the first query.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a replace query is outstanding.
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.replace_in_flight.is_some()
    }

    /// Whether an append query is outstanding.
    #[must_use]
    pub const fn is_loading_more(&self) -> bool {
        self.append_in_flight.is_some()
    }

    /// Hits reported by the most recent applied reply.
    #[must_use]
    pub const fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// Parameters for the current selection at `page`.
    #[must_use]
    pub fn params_for_page(&self, page: u32) -> QueryParameters {
        QueryParameters {
            page,
            search_term: self.search_term.clone(),
            category: self.filters.category().map(str::to_string),
            facets: self.filters.facets().clone(),
        }
    }

    /// Parameters for the current selection at the current page.
    #[must_use]
    pub fn current_params(&self) -> QueryParameters {
        self.params_for_page(self.page)
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Starts over at page 1 for the current selection.
    ///
    /// Clears the items and the latch, opens a new epoch and returns the
    /// page-1 request. Callers change the selection first.
    pub fn begin_replace(&mut self) -> FetchRequest {
        self.page = 1;
        self.items.clear();
        self.end_reached = false;

        let generation = self.next_generation();
        self.epoch = generation;
        self.replace_in_flight = Some(generation);

        tracing::debug!(
            generation,
            search_term = ?self.search_term,
            category = ?self.filters.category(),
            facets = self.filters.facets().len(),
            "replace triggered"
        );

        FetchRequest::replace(generation, self.params_for_page(1))
    }

    /// Requests the next page, unless the latch is set or a replace or an
    /// append is already outstanding.
    ///
    /// On success the latch is set and the page cursor advances by one.
    /// A suppressed request leaves the latch untouched so the next crossing
    /// after the pending reply can trigger.
    pub fn begin_append(&mut self) -> Option<FetchRequest> {
        if self.end_reached {
            tracing::trace!("append suppressed: latch set");
            return None;
        }
        if let Some(pending) = self.replace_in_flight {
            tracing::debug!(pending, "append suppressed: replace in flight");
            return None;
        }
        if let Some(pending) = self.append_in_flight {
            tracing::debug!(pending, "append suppressed: append in flight");
            return None;
        }

        self.end_reached = true;
        self.page += 1;
        let generation = self.next_generation();
        self.append_in_flight = Some(generation);

        tracing::debug!(generation, page = self.page, "append triggered");

        Some(FetchRequest::append(generation, self.current_params()))
    }

    /// Clears the near-end latch. Returns whether it was set.
    pub fn release_latch(&mut self) -> bool {
        std::mem::replace(&mut self.end_reached, false)
    }

    /// Merges a worker reply into the feed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Worker`] if the reply carries a generation that
    /// was never issued.
    pub fn apply_reply(&mut self, reply: &FetchReply) -> Result<ReplyOutcome> {
        if reply.generation == 0 || reply.generation > self.generation {
            return Err(FeedError::Worker(format!(
                "reply for unissued generation {} (latest {})",
                reply.generation, self.generation
            )));
        }

        if self.replace_in_flight == Some(reply.generation) {
            self.replace_in_flight = None;
        }
        if self.append_in_flight == Some(reply.generation) {
            self.append_in_flight = None;
        }

        if reply.generation < self.epoch {
            tracing::debug!(
                generation = reply.generation,
                epoch = self.epoch,
                mode = %reply.mode,
                "discarding stale reply"
            );
            return Ok(ReplyOutcome::Stale);
        }

        let outcome = match (&reply.outcome, reply.mode) {
            (Ok(page), FetchMode::Replace) => {
                self.items.clone_from(&page.items);
                self.total_hits = page.total_hits;
                ReplyOutcome::Replaced {
                    count: self.items.len(),
                }
            }
            (Ok(page), FetchMode::Append) if page.is_empty() => {
                self.total_hits = page.total_hits;
                ReplyOutcome::Exhausted
            }
            (Ok(page), FetchMode::Append) => {
                self.items.extend(page.items.iter().cloned());
                self.total_hits = page.total_hits;
                ReplyOutcome::Appended { added: page.len() }
            }
            (Err(failure), FetchMode::Replace) => ReplyOutcome::Failed(failure.clone()),
            (Err(failure), FetchMode::Append) => {
                if self.page == reply.page && self.page > 1 {
                    self.page -= 1;
                }
                ReplyOutcome::Failed(failure.clone())
            }
        };

        tracing::debug!(
            generation = reply.generation,
            mode = %reply.mode,
            outcome = ?outcome,
            items = self.items.len(),
            "reply applied"
        );

        Ok(outcome)
    }

    /// Owned copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> FeedViewModel {
        FeedViewModel {
            items: self.items.clone(),
            page: self.page,
            search_term: self.search_term.clone(),
            category: self.filters.category().map(str::to_string),
            chips: self.filters.chips(),
            is_refreshing: self.is_refreshing(),
            is_loading_more: self.is_loading_more(),
            end_reached: self.end_reached,
            total_hits: self.total_hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResultPage;

    fn page_of(ids: std::ops::Range<u64>) -> ResultPage {
        ResultPage::new(ids.map(|id| ImageItem::new(id, 100, 100)).collect())
    }

    fn ids(state: &FeedState) -> Vec<u64> {
        state.items().iter().map(|item| item.id).collect()
    }

    #[test]
    fn generations_strictly_increase() {
        let mut state = FeedState::new();
        let first = state.begin_replace();
        state.apply_reply(&first.reply(Ok(page_of(0..2)))).unwrap();
        let second = state.begin_append().unwrap();
        let third = state.begin_replace();

        assert!(first.generation < second.generation);
        assert!(second.generation < third.generation);
    }

    #[test]
    fn replace_resets_page_items_and_latch() {
        let mut state = FeedState::new();
        let first = state.begin_replace();
        state.apply_reply(&first.reply(Ok(page_of(0..3)))).unwrap();
        let append = state.begin_append().unwrap();
        state.apply_reply(&append.reply(Ok(page_of(3..6)))).unwrap();
        assert_eq!(state.page(), 2);
        assert!(state.end_reached());

        state.begin_replace();

        assert_eq!(state.page(), 1);
        assert!(state.items().is_empty());
        assert!(!state.end_reached());
        assert!(state.is_refreshing());
    }

    #[test]
    fn append_is_blocked_by_latch_and_in_flight_marker() {
        let mut state = FeedState::new();
        let append = state.begin_append().unwrap();
        assert_eq!(append.params.page, 2);
        assert!(state.begin_append().is_none());

        state.release_latch();
        assert!(state.begin_append().is_none(), "append still in flight");

        state.apply_reply(&append.reply(Ok(page_of(0..2)))).unwrap();
        let next = state.begin_append().unwrap();
        assert_eq!(next.params.page, 3);
    }

    #[test]
    fn append_waits_for_pending_replace() {
        let mut state = FeedState::new();
        let first = state.begin_replace();

        assert!(state.begin_append().is_none());
        assert!(!state.end_reached());
        assert_eq!(state.page(), 1);

        state.apply_reply(&first.reply(Ok(page_of(0..2)))).unwrap();
        assert_eq!(state.begin_append().unwrap().params.page, 2);
    }

    #[test]
    fn failed_replace_unblocks_append() {
        let mut state = FeedState::new();
        let first = state.begin_replace();
        state
            .apply_reply(&first.reply(Err(FetchFailure::Transport("offline".into()))))
            .unwrap();

        assert_eq!(state.begin_append().unwrap().params.page, 2);
    }

    #[test]
    fn empty_append_keeps_latch_and_page() {
        let mut state = FeedState::new();
        let append = state.begin_append().unwrap();

        let outcome = state.apply_reply(&append.reply(Ok(ResultPage::default()))).unwrap();

        assert_eq!(outcome, ReplyOutcome::Exhausted);
        assert!(state.end_reached());
        assert_eq!(state.page(), 2);
        assert!(state.begin_append().is_none());
    }

    #[test]
    fn failed_append_rolls_page_back() {
        let mut state = FeedState::new();
        let first = state.begin_replace();
        state.apply_reply(&first.reply(Ok(page_of(0..4)))).unwrap();
        let append = state.begin_append().unwrap();

        let failure = FetchFailure::Transport("offline".into());
        let outcome = state.apply_reply(&append.reply(Err(failure.clone()))).unwrap();

        assert_eq!(outcome, ReplyOutcome::Failed(failure));
        assert_eq!(state.page(), 1);
        assert_eq!(ids(&state), vec![0, 1, 2, 3]);

        state.release_latch();
        assert_eq!(state.begin_append().unwrap().params.page, 2);
    }

    #[test]
    fn failed_replace_keeps_selection() {
        let mut state = FeedState::new();
        state.search_term = Some("dogs".into());
        let request = state.begin_replace();

        let outcome = state
            .apply_reply(&request.reply(Err(FetchFailure::MalformedResponse("no hits".into()))))
            .unwrap();

        assert!(matches!(outcome, ReplyOutcome::Failed(_)));
        assert_eq!(state.search_term(), Some("dogs"));
        assert!(!state.is_refreshing());
    }

    #[test]
    fn stale_reply_clears_its_marker_but_changes_nothing() {
        let mut state = FeedState::new();
        let first = state.begin_replace();
        state.apply_reply(&first.reply(Ok(page_of(0..2)))).unwrap();
        let append = state.begin_append().unwrap();
        let second = state.begin_replace();

        let outcome = state.apply_reply(&append.reply(Ok(page_of(10..12)))).unwrap();

        assert_eq!(outcome, ReplyOutcome::Stale);
        assert!(state.items().is_empty());
        assert!(!state.is_loading_more());
        assert!(state.is_refreshing());

        state.apply_reply(&second.reply(Ok(page_of(20..22)))).unwrap();
        assert_eq!(ids(&state), vec![20, 21]);
    }

    #[test]
    fn unissued_generation_is_an_error() {
        let mut state = FeedState::new();
        let mut request = state.begin_replace();
        request.generation = 42;

        let err = state.apply_reply(&request.reply(Ok(page_of(0..1)))).unwrap_err();
        assert!(matches!(err, FeedError::Worker(_)));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut state = FeedState::new();
        state.search_term = Some("sky".into());
        let request = state.begin_replace();
        let mut page = page_of(0..5);
        page.total_hits = 480;
        state.apply_reply(&request.reply(Ok(page))).unwrap();

        let vm = state.snapshot();
        assert_eq!(vm.items.len(), 5);
        assert_eq!(vm.search_term.as_deref(), Some("sky"));
        assert_eq!(vm.total_hits, 480);
        assert!(!vm.is_refreshing);
    }
}
