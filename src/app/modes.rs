//! Fetch mode shared by requests, replies and failure reports.
//!
//! A query either starts the feed over or extends it:
//! - **Replace**: page 1 of a new selection; the reply becomes the item list
//! - **Append**: the next page of the current selection; the reply is
//!   concatenated onto the tail

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a fetch reply is merged into the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchMode {
    /// Reset pagination and replace all items with the reply.
    Replace,

    /// Append the reply's items after the existing ones.
    Append,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => f.write_str("replace"),
            Self::Append => f.write_str("append"),
        }
    }
}
