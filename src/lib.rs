//! pixfeed: a feed controller for browsing a paginated remote image catalog.
//!
//! pixfeed decides, for any combination of free-text search, category and
//! facet filters, what the next query to the catalog looks like, how results
//! accumulate or reset, and when pagination advances:
//! - Debounced search input with a fixed quiet period
//! - Category and facet filters that restart pagination from page 1
//! - Infinite scroll with a near-end latch and one outstanding append
//! - Generation-tagged requests so late replies never clobber newer results
//! - A Pixabay API client behind a pluggable `ImageSource` trait

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal driver (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  FeedSession (session.rs)                           │  ← Runtime shim
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Feed controller
//! │  - Event handling, request sequencing               │
//! │  - Filter state, snapshots                          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Input (input/)│   │ Worker        │   │ Source        │
//! │ - Debounce    │   │ (worker/)     │   │ (source/)     │
//! │ - Scroll      │   │ - tokio tasks │   │ - Pixabay API │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/), Infrastructure, Observability    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: feed state controller with the event/action model
//! - [`domain`]: items, query parameters, errors
//! - [`input`]: search debouncer and scroll near-end detection
//! - [`source`]: image source trait and the Pixabay client
//! - [`worker`]: asynchronous fetch execution
//! - [`session`]: runtime shim tying the above together
//! - [`ui`]: view-model snapshots and a plain-text renderer
//! - [`infrastructure`]: platform paths
//! - [`observability`]: OpenTelemetry tracing to a rotating file
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/pixfeed/config.toml
//! api_key = "your-pixabay-key"
//! search_debounce_ms = 500
//! request_timeout_secs = 30
//! trace_level = "debug"
//! ```
//!
//! `PIXFEED_API_KEY` and `PIXFEED_TRACE_LEVEL` override the file.
//!
//! # Example
//!
//! ```no_run
//! use pixfeed::{initialize, Config, Event};
//!
//! # async fn run() -> pixfeed::Result<()> {
//! let mut session = initialize(&Config::load()?)?;
//! session.handle(&Event::Start)?;
//! session.handle(&Event::SearchCommitted("lighthouse".into()))?;
//! session.settle().await?;
//!
//! for item in session.snapshot().items {
//!     println!("{} {}", item.id, item.webformat_url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Key Design Decisions
//!
//! ## Generations instead of cancellation
//!
//! In-flight requests are never aborted. Each carries a generation and every
//! replace opens a new epoch; replies from before the epoch are discarded on
//! arrival.
//!
//! ## Explicit side effects
//!
//! [`handle_event`] returns [`Action`]s rather than performing I/O, so the
//! controller is tested synchronously and the session owns all tasks.

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod input;
pub mod observability;
pub mod session;
pub mod source;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, Event, FeedState, FetchMode};
pub use domain::{
    Facets, FeedError, FetchFailure, ImageItem, QueryParameters, Result, ResultPage,
};
pub use session::{FailureNotice, FeedSession};

use serde::Deserialize;
use source::PixabaySource;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable overriding [`Config::api_key`].
pub const ENV_API_KEY: &str = "PIXFEED_API_KEY";

/// Environment variable overriding [`Config::trace_level`].
pub const ENV_TRACE_LEVEL: &str = "PIXFEED_TRACE_LEVEL";

/// Runtime configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pixabay API key. Required to talk to the live API.
    pub api_key: String,

    /// Search endpoint. Default: `https://pixabay.com/api/`
    pub base_url: String,

    /// Quiet period before typed text is committed as a search. Default: 500
    pub search_debounce_ms: u64,

    /// HTTP request timeout. Default: 30
    pub request_timeout_secs: u64,

    /// `EnvFilter` directive for tracing, e.g. `debug` or
    /// `pixfeed=trace`. Default: `"info"`
    pub trace_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: source::DEFAULT_BASE_URL.to_string(),
            search_debounce_ms: 500,
            request_timeout_secs: 30,
            trace_level: "info".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("trace_level", &self.trace_level)
            .finish()
    }
}

impl Config {
    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] if the file cannot be read and
    /// [`FeedError::Config`] if it is not valid TOML for this struct.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| FeedError::Config(format!("{}: {e}", path.display())))
    }

    /// Loads the default config file, if present, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the default config file exists but cannot be read
    /// or parsed.
    pub fn load() -> Result<Self> {
        let path = infrastructure::get_config_path();
        let config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading config file");
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies [`ENV_API_KEY`] and [`ENV_TRACE_LEVEL`] as returned by
    /// `lookup`. Empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(api_key) = present(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(level) = present(ENV_TRACE_LEVEL) {
            self.trace_level = level;
        }
        self
    }

    /// Search debounce quiet period.
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Creates a session backed by the Pixabay API.
///
/// Tracing is not installed here; call
/// [`observability::init_tracing`] first if spans should be exported.
///
/// # Errors
///
/// Returns [`FeedError::Config`] if the API key is missing or the base URL
/// is invalid.
pub fn initialize(config: &Config) -> Result<FeedSession> {
    tracing::debug!(config = ?config, "initializing feed session");
    let source = PixabaySource::from_config(config)?;
    Ok(FeedSession::new(Arc::new(source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"from-file\"\nsearch_debounce_ms = 300").unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.base_url, "https://pixabay.com/api/");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search_debounce_ms = \"fast\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
    }

    #[test]
    fn environment_overrides_apply_when_non_empty() {
        let config = Config::default().with_overrides(|key| match key {
            ENV_API_KEY => Some("from-env".to_string()),
            ENV_TRACE_LEVEL => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.trace_level, "info");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = Config {
            api_key: "top-secret".into(),
            ..Config::default()
        };
        assert!(!format!("{config:?}").contains("top-secret"));
    }

    #[test]
    fn initialize_requires_api_key() {
        assert!(matches!(
            initialize(&Config::default()),
            Err(FeedError::Config(_))
        ));
    }
}
