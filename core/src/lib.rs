//! Search-index construction and post-build checks for a static site.
//!
//! Rendered pages go into a [`BuildContext`]; out come a [`SearchIndex`] that a
//! browser can query by prefix without a server, and a [`WarningLog`] of broken
//! links, missing assets and unfinished content.

pub mod checker;
pub mod config;
pub mod content;
pub mod dates;
pub mod extract;
pub mod index;
pub mod paths;
pub mod persist;
pub mod pipeline;
pub mod registry;
pub mod scores;
pub mod tokenizer;
pub mod trie;
pub mod warnings;

pub use config::{BuildConfig, ExternalLink};
pub use index::*;
pub use pipeline::{BuildContext, BuildOutput, PageInput};
pub use registry::{DocId, Document, DocumentKind, Registry};
pub use scores::ScoreMap;
pub use warnings::WarningLog;
