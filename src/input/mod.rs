//! User input adapters feeding the controller.
//!
//! - [`debounce`]: keystroke text to committed search terms
//! - [`scroll`]: scroll position to near-end signals

pub mod debounce;
pub mod scroll;

pub use debounce::{spawn_search_debouncer, SearchDebouncer, SearchInput, DEFAULT_QUIET_PERIOD};
pub use scroll::ScrollMetrics;
