//! Prefix trie over every scored token.
//!
//! Construction happens in two steps. [`TrieBuilder`] inserts tokens with their
//! IDF-adjusted per-document weights; [`TrieBuilder::finish`] then runs a single
//! post-order pass that folds every child's cumulative scores into its parent
//! (decayed by [`PREFIX_DECAY_FACTOR`]), so that a query for a prefix also
//! surfaces documents matching longer words. The resulting [`ScoredTrie`] is
//! read-only and is encoded against a shared [`ResultTable`], which stores each
//! distinct top-N list once.

use crate::registry::{DocId, Registry};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Share of a child's cumulative score that propagates to its parent prefix.
pub const PREFIX_DECAY_FACTOR: f64 = 0.8;
/// Propagated scores at or below this value are dropped.
pub const MIN_PROPAGATED_SCORE: u64 = 1;
/// Keeps precision when IDF-weighted scores are truncated to integers.
pub const IDF_SCALE: f64 = 10_000.0 * 65_536.0;
/// Default length cap of a ranked result list.
pub const DEFAULT_MAX_RESULTS: usize = 20;

type Scores = BTreeMap<DocId, u64>;

/// `ln(N / (1 + df)) + 1`. Positive whenever `df <= N`.
pub fn idf_factor(total_documents: usize, documents_containing: usize) -> f64 {
    (total_documents as f64 / (1 + documents_containing) as f64).ln() + 1.0
}

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    leaf: Option<Scores>,
    cumulative: Scores,
}

impl TrieNode {
    fn propagate(&mut self) {
        let mut total = self.leaf.clone().unwrap_or_default();
        for child in self.children.values_mut() {
            child.propagate();
            for (&doc, &score) in &child.cumulative {
                let decayed = (score as f64 * PREFIX_DECAY_FACTOR) as u64;
                if decayed <= MIN_PROPAGATED_SCORE { continue; }
                *total.entry(doc).or_insert(0) += decayed;
            }
        }
        self.cumulative = total;
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(TrieNode::count).sum::<usize>()
    }
}

pub struct TrieBuilder {
    root: TrieNode,
    total_documents: usize,
    tokens: usize,
}

impl TrieBuilder {
    /// `total_documents` is the size of the whole registry; it drives the IDF factor.
    pub fn new(total_documents: usize) -> Self {
        Self { root: TrieNode::default(), total_documents, tokens: 0 }
    }

    /// Insert a token with the raw per-document weights from the score map.
    pub fn insert(&mut self, token: &str, weights: &BTreeMap<DocId, u64>) {
        if token.is_empty() || weights.is_empty() { return; }
        let idf = idf_factor(self.total_documents, weights.len());
        let mut node = &mut self.root;
        for c in token.chars() {
            node = node.children.entry(c).or_default();
        }
        let leaf = node.leaf.get_or_insert_with(BTreeMap::new);
        for (&doc, &weight) in weights {
            let scaled = (weight as f64 * idf * IDF_SCALE).round() as u64;
            *leaf.entry(doc).or_insert(0) += scaled;
        }
        self.tokens += 1;
    }

    /// Compute cumulative scores bottom-up, once.
    pub fn finish(mut self) -> ScoredTrie {
        self.root.propagate();
        ScoredTrie { root: self.root, tokens: self.tokens }
    }
}

/// A fully scored, read-only trie.
pub struct ScoredTrie {
    root: TrieNode,
    tokens: usize,
}

impl ScoredTrie {
    fn node(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Cumulative scores of a prefix; `None` if no token starts with it.
    pub fn scores(&self, prefix: &str) -> Option<&BTreeMap<DocId, u64>> {
        self.node(prefix).map(|n| &n.cumulative)
    }

    /// True if `token` was inserted as a complete word.
    pub fn contains_token(&self, token: &str) -> bool {
        self.node(token).is_some_and(|n| n.leaf.is_some())
    }

    pub fn token_count(&self) -> usize { self.tokens }

    /// Number of prefixes, the empty one included.
    pub fn node_count(&self) -> usize { self.root.count() }

    /// Flat encoding: every prefix with at least one scored document maps to its
    /// table slot. The empty prefix always carries the default ranking.
    pub fn encode_flat(&self, ranker: &Ranker<'_>, table: &mut ResultTable) -> BTreeMap<String, usize> {
        let mut words = BTreeMap::new();
        words.insert(String::new(), table.intern(ranker.default_ranking()));
        let mut key = String::new();
        for (&c, child) in &self.root.children {
            key.push(c);
            encode_flat_node(child, &mut key, ranker, table, &mut words);
            key.pop();
        }
        words
    }

    /// Nested encoding: `{"S": slot, "C": {letter: child}}` from the root down.
    pub fn encode_nested(&self, ranker: &Ranker<'_>, table: &mut ResultTable) -> NestedNode {
        let slot = table.intern(ranker.default_ranking());
        NestedNode {
            slot: Some(slot),
            children: self
                .root
                .children
                .iter()
                .map(|(&c, child)| (c.to_string(), encode_nested_node(child, ranker, table)))
                .collect(),
        }
    }
}

fn encode_flat_node(
    node: &TrieNode,
    key: &mut String,
    ranker: &Ranker<'_>,
    table: &mut ResultTable,
    words: &mut BTreeMap<String, usize>,
) {
    if !node.cumulative.is_empty() {
        words.insert(key.clone(), table.intern(ranker.rank(&node.cumulative)));
    }
    for (&c, child) in &node.children {
        key.push(c);
        encode_flat_node(child, key, ranker, table, words);
        key.pop();
    }
}

fn encode_nested_node(node: &TrieNode, ranker: &Ranker<'_>, table: &mut ResultTable) -> NestedNode {
    let slot = (!node.cumulative.is_empty()).then(|| table.intern(ranker.rank(&node.cumulative)));
    let children = node
        .children
        .iter()
        .map(|(&c, child)| (c.to_string(), encode_nested_node(child, ranker, table)))
        .collect();
    NestedNode { slot, children }
}

/// One node of the nested trie encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedNode {
    #[serde(rename = "S", default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    #[serde(rename = "C", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, NestedNode>,
}

/// Orders documents for a prefix and caps the list length.
pub struct Ranker<'a> {
    registry: &'a Registry,
    max_results: usize,
}

impl<'a> Ranker<'a> {
    pub fn new(registry: &'a Registry, max_results: usize) -> Self {
        Self { registry, max_results }
    }

    /// Priority descending, then title ascending, then index ascending.
    fn tie_break(&self, a: DocId, b: DocId) -> Ordering {
        let (pa, ta) = self.registry.get(a).map_or((0, ""), |d| (d.priority, d.title.as_str()));
        let (pb, tb) = self.registry.get(b).map_or((0, ""), |d| (d.priority, d.title.as_str()));
        pb.cmp(&pa).then_with(|| ta.cmp(tb)).then_with(|| a.cmp(&b))
    }

    /// Score descending, ties broken by [`Ranker::tie_break`].
    pub fn rank(&self, scores: &BTreeMap<DocId, u64>) -> Vec<DocId> {
        let mut ranked: Vec<(DocId, u64)> = scores.iter().map(|(&d, &s)| (d, s)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| self.tie_break(a.0, b.0)));
        ranked.into_iter().take(self.max_results).map(|(d, _)| d).collect()
    }

    /// Ranking used when there is no query: every document by priority.
    pub fn default_ranking(&self) -> Vec<DocId> {
        let mut ids: Vec<DocId> = self.registry.iter().map(|(id, _)| id).collect();
        ids.sort_by(|&a, &b| self.tie_break(a, b));
        ids.truncate(self.max_results);
        ids
    }
}

/// Deduplicated sequence of ranked document lists.
#[derive(Debug, Default)]
pub struct ResultTable {
    entries: Vec<Vec<DocId>>,
    slots: HashMap<Vec<DocId>, usize>,
}

impl ResultTable {
    pub fn new() -> Self { Self::default() }

    /// Slot of an equal list if one exists, otherwise a newly appended slot.
    pub fn intern(&mut self, list: Vec<DocId>) -> usize {
        if let Some(&slot) = self.slots.get(&list) {
            return slot;
        }
        let slot = self.entries.len();
        self.slots.insert(list.clone(), slot);
        self.entries.push(list);
        slot
    }

    pub fn get(&self, slot: usize) -> Option<&[DocId]> { self.entries.get(slot).map(Vec::as_slice) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn into_entries(self) -> Vec<Vec<DocId>> { self.entries }
}
