//! Build configuration.
//!
//! Tuning constants live next to the code that uses them (`scores`, `trie`);
//! this module holds the per-site settings. Every field has a default, so a site
//! config file only needs to name what it changes.

use crate::index::Encoding;
use crate::tokenizer::TokenizerOptions;
use crate::trie::DEFAULT_MAX_RESULTS;
use serde::{Deserialize, Serialize};

/// Priority of a page that does not declare one.
pub const DEFAULT_PAGE_PRIORITY: u32 = 10;

/// A fixed off-site link that is always searchable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub title: String,
    pub url: String,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Length cap of every ranked result list.
    pub max_results: usize,
    /// Accumulate body text at body weight. Titles and headings are always indexed.
    pub index_body: bool,
    /// Drop common English function words while tokenizing.
    pub stopwords: bool,
    pub encoding: Encoding,
    pub default_priority: u32,
    /// Registered before any page, in this order.
    pub externals: Vec<ExternalLink>,
    /// Pages that need no inbound link besides the root and home page.
    pub exempt_paths: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            index_body: true,
            stopwords: false,
            encoding: Encoding::Flat,
            default_priority: DEFAULT_PAGE_PRIORITY,
            externals: Vec::new(),
            exempt_paths: Vec::new(),
        }
    }
}

impl BuildConfig {
    pub fn tokenizer(&self) -> TokenizerOptions {
        TokenizerOptions { stopwords: self.stopwords }
    }
}
