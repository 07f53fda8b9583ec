//! Feed session: the runtime around one [`FeedState`].
//!
//! The session owns the state, a [`FetchWorker`] and the worker's reply
//! channel. It feeds events to [`handle_event`], executes the returned
//! actions, and turns replies back into [`Event::FetchCompleted`].
//!
//! ```text
//! caller ──Event──▶ FeedSession::handle ──Action::Fetch──▶ FetchWorker
//!    ▲                                                         │
//!    └────── snapshot ◀── FeedSession::pump ◀──FetchReply──────┘
//! ```

use crate::app::{handle_event, Action, Event, FeedState, FetchMode};
use crate::domain::Result;
use crate::source::ImageSource;
use crate::ui::FeedViewModel;
use crate::worker::{FetchReply, FetchWorker};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A failed query, kept for the caller to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    /// Mode of the query that failed.
    pub mode: FetchMode,
    /// Human-readable failure description.
    pub message: String,
}

/// One browsing session over an image source.
pub struct FeedSession {
    state: FeedState,
    worker: FetchWorker,
    replies: mpsc::UnboundedReceiver<FetchReply>,
    outstanding: usize,
    notices: Vec<FailureNotice>,
}

impl FeedSession {
    /// Creates a session with an empty feed. Nothing is fetched until the
    /// first event.
    #[must_use]
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        let (worker, replies) = FetchWorker::new(source);
        Self {
            state: FeedState::new(),
            worker,
            replies,
            outstanding: 0,
            notices: Vec::new(),
        }
    }

    /// Handles `event` and executes the resulting actions.
    ///
    /// Returns whether observable state changed. Must be called from within
    /// a tokio runtime since fetches are spawned as tasks.
    ///
    /// # Errors
    ///
    /// Propagates [`handle_event`] errors.
    pub fn handle(&mut self, event: &Event) -> Result<bool> {
        let (changed, actions) = handle_event(&mut self.state, event)?;
        for action in actions {
            self.execute(action);
        }
        Ok(changed)
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Fetch(request) => {
                self.outstanding += 1;
                self.worker.dispatch(request);
            }
            Action::ReportFailure { mode, message } => {
                self.notices.push(FailureNotice { mode, message });
            }
        }
    }

    /// Number of dispatched queries whose replies have not been applied.
    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Waits for the next worker reply without applying it.
    ///
    /// Returns `None` when nothing is outstanding.
    pub async fn next_reply(&mut self) -> Option<FetchReply> {
        if self.outstanding == 0 {
            return None;
        }
        let reply = self.replies.recv().await?;
        self.outstanding -= 1;
        Some(reply)
    }

    /// Waits for the next reply and applies it.
    ///
    /// Returns `Ok(false)` immediately when nothing is outstanding.
    ///
    /// # Errors
    ///
    /// Propagates [`handle_event`] errors for the reply.
    pub async fn pump(&mut self) -> Result<bool> {
        match self.next_reply().await {
            Some(reply) => self.handle(&Event::FetchCompleted(reply)),
            None => Ok(false),
        }
    }

    /// Applies every reply that has already arrived, without waiting.
    ///
    /// # Errors
    ///
    /// Propagates [`handle_event`] errors for the replies.
    pub fn pump_ready(&mut self) -> Result<bool> {
        let mut changed = false;
        while self.outstanding > 0 {
            let Ok(reply) = self.replies.try_recv() else {
                break;
            };
            self.outstanding -= 1;
            changed |= self.handle(&Event::FetchCompleted(reply))?;
        }
        Ok(changed)
    }

    /// Applies replies until no query is outstanding.
    ///
    /// # Errors
    ///
    /// Propagates [`handle_event`] errors for the replies.
    pub async fn settle(&mut self) -> Result<()> {
        while self.outstanding > 0 {
            self.pump().await?;
        }
        Ok(())
    }

    /// Drains the failure notices collected since the last call.
    pub fn take_notices(&mut self) -> Vec<FailureNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Current feed state.
    #[must_use]
    pub const fn state(&self) -> &FeedState {
        &self.state
    }

    /// Owned snapshot for rendering.
    #[must_use]
    pub fn snapshot(&self) -> FeedViewModel {
        self.state.snapshot()
    }
}
