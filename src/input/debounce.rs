//! Debounced search input.
//!
//! Keystrokes restart a quiet period; the latest text is committed only once
//! the period elapses with no further input. Clearing the box bypasses the
//! quiet period and commits an empty term at once.
//!
//! [`SearchDebouncer`] is the clock-free core: callers pass the current
//! [`Instant`] explicitly. [`spawn_search_debouncer`] drives the same core
//! from a tokio task.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Default quiet period before a search term is committed.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Rate limiter turning keystroke text into committed search terms.
///
/// # Example
///
/// ```
/// use pixfeed::input::SearchDebouncer;
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// let mut debouncer = SearchDebouncer::new(Duration::from_millis(500));
/// let t0 = Instant::now();
/// debouncer.input("ca", t0);
/// debouncer.input("cat", t0 + Duration::from_millis(300));
///
/// assert_eq!(debouncer.poll(t0 + Duration::from_millis(700)), None);
/// assert_eq!(debouncer.poll(t0 + Duration::from_millis(800)), Some("cat".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl SearchDebouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Records new text and restarts the quiet period from `now`.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.quiet));
    }

    /// When the pending text will be committed, if any is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Whether text is waiting for its quiet period to elapse.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending text if its quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    /// Drops any pending text and returns the empty term to commit now.
    pub fn cancel(&mut self) -> String {
        self.pending = None;
        String::new()
    }
}

/// Input to a spawned debouncer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// The search box now contains this text.
    Keystroke(String),
    /// The search box was cleared with its clear control.
    Clear,
}

/// Spawns a task applying [`SearchDebouncer`] to a stream of inputs.
///
/// Committed terms arrive on the returned receiver. The task exits, dropping
/// any pending text, when the input sender is dropped or the receiver is
/// closed. Must be called from within a tokio runtime.
pub fn spawn_search_debouncer(
    quiet: Duration,
) -> (mpsc::UnboundedSender<SearchInput>, mpsc::UnboundedReceiver<String>) {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let (commit_tx, commit_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut debouncer = SearchDebouncer::new(quiet);
        loop {
            let deadline = debouncer.deadline();
            let committed = tokio::select! {
                input = input_rx.recv() => match input {
                    Some(SearchInput::Keystroke(text)) => {
                        tracing::trace!(len = text.len(), "search keystroke");
                        debouncer.input(text, Instant::now());
                        None
                    }
                    Some(SearchInput::Clear) => Some(debouncer.cancel()),
                    None => break,
                },
                () = wait_until(deadline) => debouncer.poll(Instant::now()),
            };

            if let Some(term) = committed {
                tracing::debug!(term = %term, "search term committed");
                if commit_tx.send(term).is_err() {
                    break;
                }
            }
        }
        tracing::trace!("search debouncer stopped");
    });

    (input_tx, commit_rx)
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn each_input_restarts_the_quiet_period() {
        let mut debouncer = SearchDebouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.input("d", t0);
        debouncer.input("do", t0 + Duration::from_millis(400));
        assert_eq!(debouncer.deadline(), Some(t0 + Duration::from_millis(900)));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(600)), None);
        assert_eq!(
            debouncer.poll(t0 + Duration::from_millis(900)),
            Some("do".to_string())
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn cancel_drops_pending_text() {
        let mut debouncer = SearchDebouncer::new(QUIET);
        let t0 = Instant::now();
        debouncer.input("dogs", t0);

        assert_eq!(debouncer.cancel(), "");
        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.poll(t0 + QUIET), None);
    }

    #[tokio::test(start_paused = true)]
    async fn task_commits_latest_text_after_quiet_period() {
        let (inputs, mut commits) = spawn_search_debouncer(QUIET);
        let start = Instant::now();

        inputs.send(SearchInput::Keystroke("c".into())).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        inputs.send(SearchInput::Keystroke("cat".into())).unwrap();

        let committed = commits.recv().await;
        assert_eq!(committed.as_deref(), Some("cat"));
        assert!(start.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn task_commits_clear_immediately() {
        let (inputs, mut commits) = spawn_search_debouncer(QUIET);
        let start = Instant::now();

        inputs.send(SearchInput::Keystroke("catt".into())).unwrap();
        inputs.send(SearchInput::Clear).unwrap();

        assert_eq!(commits.recv().await.as_deref(), Some(""));
        assert!(start.elapsed() < QUIET);

        tokio::time::sleep(QUIET * 2).await;
        assert!(commits.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn task_stops_when_inputs_close() {
        let (inputs, mut commits) = spawn_search_debouncer(QUIET);
        inputs.send(SearchInput::Keystroke("bear".into())).unwrap();
        drop(inputs);

        assert_eq!(commits.recv().await, None);
    }
}
