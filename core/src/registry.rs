//! Document registry: one stable integer index per searchable unit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A whole generated page.
    Page,
    /// A fragment-addressable subsection of a page.
    Section,
    /// A fixed link that points off-site (social profiles, contact).
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub path: String,
    pub priority: u32,
    pub kind: DocumentKind,
}

/// Append-only sequence of documents. The index of a document is its position.
#[derive(Debug, Default)]
pub struct Registry {
    docs: Vec<Document>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, title: impl Into<String>, path: impl Into<String>, priority: u32, kind: DocumentKind) -> DocId {
        let id = self.docs.len() as DocId;
        self.docs.push(Document { title: title.into(), path: path.into(), priority, kind });
        id
    }

    pub fn register_page(&mut self, title: &str, path: &str, priority: u32) -> DocId {
        self.register(title, path, priority, DocumentKind::Page)
    }

    /// Registers a subsection of `parent`, deriving title, path and priority from it.
    ///
    /// Returns `None` if `parent` is not a registered document.
    pub fn register_section(&mut self, parent: DocId, fragment_id: &str, heading: &str) -> Option<DocId> {
        let page = self.get(parent)?;
        let title = format!("{}: {}", page.title, heading);
        let path = format!("{}#{}", page.path, fragment_id);
        let priority = page.priority / 10;
        Some(self.register(title, path, priority, DocumentKind::Section))
    }

    pub fn register_external(&mut self, title: &str, url: &str, priority: u32) -> DocId {
        self.register(title, url, priority, DocumentKind::External)
    }

    pub fn get(&self, id: DocId) -> Option<&Document> { self.docs.get(id as usize) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.docs.iter().enumerate().map(|(i, d)| (i as DocId, d))
    }

    pub fn pages(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.iter().filter(|(_, d)| d.kind == DocumentKind::Page)
    }

    /// Paths of every page-kind document, in sorted order.
    pub fn page_paths(&self) -> BTreeSet<&str> {
        self.pages().map(|(_, d)| d.path.as_str()).collect()
    }

    pub fn count(&self, kind: DocumentKind) -> usize {
        self.docs.iter().filter(|d| d.kind == kind).count()
    }
}
