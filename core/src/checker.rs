//! Post-build consistency checks over the rendered corpus.

use crate::paths::{asset_file, canonical_page, linked_file, parse_link, HOME, ROOT};
use crate::registry::Registry;
use crate::warnings::WarningLog;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Something a page points at: another page or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub page: String,
    pub target: String,
}

/// Links, asset references and emitted fragment ids collected while rendering.
#[derive(Debug, Default)]
pub struct References {
    links: Vec<Reference>,
    assets: Vec<Reference>,
    fragments: HashMap<String, BTreeSet<String>>,
}

impl References {
    pub fn new() -> Self { Self::default() }

    pub fn add_link(&mut self, page: &str, target: &str) {
        self.links.push(Reference { page: page.to_string(), target: target.to_string() });
    }

    pub fn add_asset(&mut self, page: &str, asset: &str) {
        self.assets.push(Reference { page: page.to_string(), target: asset.to_string() });
    }

    /// Record an `id` emitted on `page`, addressable as `page#id`.
    pub fn add_fragment(&mut self, page: &str, id: &str) {
        self.fragments.entry(canonical_page(page)).or_default().insert(id.to_string());
    }

    pub fn links(&self) -> &[Reference] { &self.links }

    pub fn assets(&self) -> &[Reference] { &self.assets }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckStats {
    pub local_links: usize,
    pub assets: usize,
    pub warnings: usize,
}

pub struct LinkChecker<'a> {
    registry: &'a Registry,
    exempt: BTreeSet<String>,
    output_root: Option<&'a Path>,
}

impl<'a> LinkChecker<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        let exempt = [ROOT, HOME].into_iter().map(String::from).collect();
        Self { registry, exempt, output_root: None }
    }

    /// Pages that never need an inbound link, on top of the root and home page.
    pub fn exempt<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exempt.extend(pages.into_iter().map(|p| canonical_page(p.as_ref())));
        self
    }

    /// Directory asset references are resolved against. Without one, assets are not checked.
    pub fn output_root(mut self, root: &'a Path) -> Self {
        self.output_root = Some(root);
        self
    }

    pub fn check(&self, refs: &References, warnings: &mut WarningLog) -> CheckStats {
        let before = warnings.len();
        let mut stats = CheckStats::default();

        let mut inbound: BTreeMap<String, usize> = self
            .registry
            .pages()
            .map(|(_, d)| (canonical_page(&d.path), 0))
            .collect();
        inbound.entry(ROOT.to_string()).or_insert(0);

        for link in &refs.links {
            if let Some(file) = linked_file(&link.target) {
                self.check_file(link, &file, &mut stats, warnings);
                continue;
            }
            let Some(local) = parse_link(&link.target, &link.page) else { continue };
            stats.local_links += 1;
            let Some(count) = inbound.get_mut(&local.page) else {
                warnings.warn(&link.page, format!("Invalid local path '{}'", link.target.trim()));
                continue;
            };
            if local.page != canonical_page(&link.page) {
                *count += 1;
            }
            if let Some(fragment) = &local.fragment {
                let known = refs.fragments.get(&local.page).is_some_and(|ids| ids.contains(fragment));
                if !known {
                    warnings.warn(&link.page, format!("Missing fragment '#{}' in '{}'", fragment, local.page));
                }
            }
        }

        for (_, doc) in self.registry.pages() {
            let key = canonical_page(&doc.path);
            if self.exempt.contains(&key) {
                continue;
            }
            if inbound.get(&key).copied().unwrap_or(0) == 0 {
                warnings.warn(&doc.path, "Not linked in any other site");
            }
        }

        for asset in &refs.assets {
            if let Some(file) = asset_file(&asset.target) {
                self.check_file(asset, &file, &mut stats, warnings);
            }
        }

        stats.warnings = warnings.len() - before;
        tracing::info!(local_links = stats.local_links, assets = stats.assets, warnings = stats.warnings, "link check complete");
        stats
    }

    /// Linked documents and embedded assets must exist under the output root.
    fn check_file(&self, reference: &Reference, file: &str, stats: &mut CheckStats, warnings: &mut WarningLog) {
        let Some(root) = self.output_root else { return };
        stats.assets += 1;
        if !root.join(file).is_file() {
            warnings.warn(&reference.page, format!("Missing file '{}'", reference.target.trim()));
        }
    }
}
