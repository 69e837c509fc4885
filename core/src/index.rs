use crate::registry::{DocId, Registry};
use crate::scores::ScoreMap;
use crate::tokenizer::fold_char;
use crate::trie::{NestedNode, Ranker, ResultTable, TrieBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Public view of a document; priority only matters at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub path: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Flat,
    Nested,
}

/// Prefix -> table slot, in one of the two encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordIndex {
    Nested(NestedNode),
    Flat(BTreeMap<String, usize>),
}

/// The serialized search artifact consumed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub sites: Vec<SiteEntry>,
    pub score_confs: Vec<Vec<DocId>>,
    pub words: WordIndex,
}

/// Summary of a build, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub documents: usize,
    pub tokens: usize,
    pub prefixes: usize,
    pub slots: usize,
}

impl SearchIndex {
    /// Build the artifact from a finished registry and score map.
    pub fn build(registry: &Registry, scores: &ScoreMap, max_results: usize, encoding: Encoding) -> (Self, IndexStats) {
        let mut builder = TrieBuilder::new(registry.len());
        for (token, weights) in scores.iter() {
            builder.insert(token, weights);
        }
        let trie = builder.finish();

        let ranker = Ranker::new(registry, max_results);
        let mut table = ResultTable::new();
        let words = match encoding {
            Encoding::Flat => WordIndex::Flat(trie.encode_flat(&ranker, &mut table)),
            Encoding::Nested => WordIndex::Nested(trie.encode_nested(&ranker, &mut table)),
        };
        let stats = IndexStats {
            documents: registry.len(),
            tokens: trie.token_count(),
            prefixes: trie.node_count(),
            slots: table.len(),
        };
        let sites = registry
            .iter()
            .map(|(_, d)| SiteEntry { path: d.path.clone(), title: d.title.clone() })
            .collect();
        (Self { sites, score_confs: table.into_entries(), words }, stats)
    }

    /// Ranked documents for a query prefix, resolved the way the client does it:
    /// lowercase, fold accents, keep letters only.
    pub fn lookup(&self, prefix: &str) -> &[DocId] {
        let key: String = prefix
            .to_lowercase()
            .chars()
            .map(fold_char)
            .filter(char::is_ascii_lowercase)
            .collect();
        self.slot(&key).and_then(|s| self.score_confs.get(s)).map_or(&[], Vec::as_slice)
    }

    /// Table slot stored for an already normalized prefix.
    pub fn slot(&self, key: &str) -> Option<usize> {
        match &self.words {
            WordIndex::Flat(words) => words.get(key).copied(),
            WordIndex::Nested(root) => {
                let mut node = root;
                for c in key.chars() {
                    node = node.children.get(&c.to_string())?;
                }
                node.slot
            }
        }
    }

    pub fn site(&self, id: DocId) -> Option<&SiteEntry> { self.sites.get(id as usize) }
}
