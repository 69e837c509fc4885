//! The build context: owns the registry, score map, warning log and collected
//! references for one build, and runs the stages in order.

use crate::checker::{LinkChecker, References};
use crate::config::BuildConfig;
use crate::content::lint_body;
use crate::dates::duration_text;
use crate::extract::scan_body;
use crate::index::{IndexStats, SearchIndex};
use crate::registry::{DocId, DocumentKind, Registry};
use crate::scores::{ScoreMap, BODY_WEIGHT, SECTION_TITLE_WEIGHT, TITLE_WEIGHT};
use crate::warnings::WarningLog;
use serde::Deserialize;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};

/// One rendered page as handed over by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageInput {
    pub path: String,
    pub title: String,
    /// Rendered body markup. Sections, fragment ids, links and assets are read from it.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub priority: Option<u32>,
    /// `MM/YYYY — MM/YYYY` range shown on the page's card.
    #[serde(default)]
    pub date_range: Option<String>,
    /// Links emitted outside the body.
    #[serde(default)]
    pub links: Vec<String>,
    /// Asset references emitted outside the body.
    #[serde(default)]
    pub assets: Vec<String>,
}

pub struct BuildOutput {
    pub index: SearchIndex,
    pub warnings: WarningLog,
    pub stats: IndexStats,
}

pub struct BuildContext {
    config: BuildConfig,
    registry: Registry,
    scores: ScoreMap,
    warnings: WarningLog,
    refs: References,
    output_root: Option<PathBuf>,
    today: Date,
}

impl BuildContext {
    /// Start a build; the configured external links are registered right away.
    pub fn new(config: BuildConfig) -> Self {
        let mut registry = Registry::new();
        let mut scores = ScoreMap::with_options(config.tokenizer());
        for link in &config.externals {
            let id = registry.register_external(&link.title, &link.url, link.priority);
            scores.accumulate(id, &link.title, TITLE_WEIGHT);
        }
        Self {
            config,
            registry,
            scores,
            warnings: WarningLog::new(),
            refs: References::new(),
            output_root: None,
            today: OffsetDateTime::now_utc().date(),
        }
    }

    /// Directory the rendered site lives in; enables asset checks.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(root.into());
        self
    }

    /// Date that `present` resolves to.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }

    pub fn registry(&self) -> &Registry { &self.registry }

    pub fn scores(&self) -> &ScoreMap { &self.scores }

    pub fn warnings(&self) -> &WarningLog { &self.warnings }

    /// Record a warning for `page` outside the built-in checks.
    pub fn warn(&mut self, page: &str, message: impl Into<String>) {
        self.warnings.warn(page, message);
    }

    /// Duration of a card's date range; malformed ranges are recorded on `page`
    /// and yield an empty string.
    pub fn duration_text(&mut self, page: &str, range: &str) -> String {
        match duration_text(range, self.today) {
            Ok(text) => text,
            Err(err) => {
                self.warnings.warn(page, err.to_string());
                String::new()
            }
        }
    }

    /// Register a page with its sections and feed its text to the score map.
    pub fn add_page(&mut self, page: PageInput) -> DocId {
        self.warnings.touch(&page.path);
        for warning in lint_body(&page.body) {
            self.warnings.warn(&page.path, warning);
        }
        if let Some(range) = &page.date_range {
            self.duration_text(&page.path, range);
        }

        let priority = page.priority.unwrap_or(self.config.default_priority);
        let id = self.registry.register_page(&page.title, &page.path, priority);
        self.scores.accumulate(id, &page.title, TITLE_WEIGHT);

        let scan = scan_body(&page.body);
        if self.config.index_body {
            self.scores.accumulate(id, &scan.text, BODY_WEIGHT);
        }
        for section in &scan.sections {
            let Some(sid) = self.registry.register_section(id, &section.id, &section.heading) else { continue };
            self.scores.accumulate(sid, &section.heading, SECTION_TITLE_WEIGHT);
            if self.config.index_body {
                self.scores.accumulate(sid, &section.text, BODY_WEIGHT);
            }
        }

        for fragment in &scan.fragment_ids {
            self.refs.add_fragment(&page.path, fragment);
        }
        for link in scan.links.iter().chain(&page.links) {
            self.refs.add_link(&page.path, link);
        }
        for asset in scan.assets.iter().chain(&page.assets) {
            self.refs.add_asset(&page.path, asset);
        }

        tracing::debug!(path = %page.path, id, sections = scan.sections.len(), links = scan.links.len(), "page registered");
        id
    }

    /// Check links and assets, then build the index.
    pub fn finish(mut self) -> BuildOutput {
        let mut checker = LinkChecker::new(&self.registry).exempt(&self.config.exempt_paths);
        if let Some(root) = &self.output_root {
            checker = checker.output_root(root);
        }
        checker.check(&self.refs, &mut self.warnings);

        let (index, stats) = SearchIndex::build(&self.registry, &self.scores, self.config.max_results, self.config.encoding);
        tracing::info!(
            documents = stats.documents,
            pages = self.registry.count(DocumentKind::Page),
            sections = self.registry.count(DocumentKind::Section),
            externals = self.registry.count(DocumentKind::External),
            tokens = stats.tokens,
            prefixes = stats.prefixes,
            slots = stats.slots,
            warnings = self.warnings.len(),
            "search index built"
        );
        BuildOutput { index, warnings: self.warnings, stats }
    }
}
