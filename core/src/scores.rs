use crate::registry::DocId;
use crate::tokenizer::{normalize_with, TokenizerOptions};
use std::collections::BTreeMap;

/// Weight of a token found in a page or external link title.
pub const TITLE_WEIGHT: u64 = 100;
/// Weight of a token found in a section heading.
pub const SECTION_TITLE_WEIGHT: u64 = 20;
/// Weight of a token found in running body text.
pub const BODY_WEIGHT: u64 = 1;

/// Per-document weights of a single token.
pub type DocWeights = BTreeMap<DocId, u64>;

/// token -> (document -> accumulated weight)
#[derive(Debug, Default)]
pub struct ScoreMap {
    options: TokenizerOptions,
    scores: BTreeMap<String, DocWeights>,
}

impl ScoreMap {
    pub fn new() -> Self { Self::default() }

    pub fn with_options(options: TokenizerOptions) -> Self {
        Self { options, scores: BTreeMap::new() }
    }

    /// Tokenize `text` and add `weight` to every token occurrence for `doc`.
    pub fn accumulate(&mut self, doc: DocId, text: &str, weight: u64) {
        if weight == 0 { return; }
        for token in normalize_with(text, &self.options) {
            *self.scores.entry(token).or_default().entry(doc).or_insert(0) += weight;
        }
    }

    pub fn get(&self, token: &str) -> Option<&DocWeights> { self.scores.get(token) }

    /// Number of documents with a positive weight for `token`.
    pub fn documents_containing(&self, token: &str) -> usize {
        self.scores.get(token).map_or(0, |w| w.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocWeights)> {
        self.scores.iter().map(|(t, w)| (t.as_str(), w))
    }

    pub fn len(&self) -> usize { self.scores.len() }

    pub fn is_empty(&self) -> bool { self.scores.is_empty() }
}
