use anyhow::{Context, Result};
use folio_core::extract::parse_document;
use folio_core::persist::{load_index, save_index};
use folio_core::{BuildConfig, BuildContext, BuildOutput, ExternalLink, PageInput, SiteEntry};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Pages plus any external links declared next to them.
#[derive(Debug, Default, Deserialize)]
pub struct SiteInput {
    pub pages: Vec<PageInput>,
    #[serde(default)]
    pub externals: Vec<ExternalLink>,
}

pub struct BuildRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where assets are looked up. Defaults to `input` when it is a directory.
    pub site_root: Option<PathBuf>,
    pub config: BuildConfig,
}

/// Load a JSON site config; no path means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    let Some(path) = path else { return Ok(BuildConfig::default()) };
    let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// Read pages from a directory of rendered `.html` files, a JSON manifest or a JSONL file.
pub fn collect_pages(input: &Path) -> Result<SiteInput> {
    if input.is_dir() {
        return collect_html(input);
    }
    match input.extension().and_then(|s| s.to_str()) {
        Some("jsonl") => collect_jsonl(input),
        Some("json") => collect_json(input),
        _ => anyhow::bail!("unsupported input {}: expected a directory, .json or .jsonl", input.display()),
    }
}

fn collect_html(root: &Path) -> Result<SiteInput> {
    let mut site = SiteInput::default();
    for entry in WalkDir::new(root).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if !p.is_file() || p.extension().and_then(|s| s.to_str()) != Some("html") {
            continue;
        }
        let rel = p.strip_prefix(root)?.with_extension("");
        let page_path = rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/");
        let html = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
        site.pages.push(parse_document(&page_path, &html));
    }
    Ok(site)
}

fn collect_jsonl(file: &Path) -> Result<SiteInput> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut site = SiteInput::default();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let page: PageInput = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        site.pages.push(page);
    }
    Ok(site)
}

fn collect_json(file: &Path) -> Result<SiteInput> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    let site = match json {
        serde_json::Value::Array(arr) => {
            let pages = arr.into_iter().map(serde_json::from_value).collect::<Result<Vec<PageInput>, _>>()?;
            SiteInput { pages, externals: Vec::new() }
        }
        serde_json::Value::Object(obj) if obj.contains_key("pages") => serde_json::from_value(serde_json::Value::Object(obj))?,
        serde_json::Value::Object(obj) => {
            let page: PageInput = serde_json::from_value(serde_json::Value::Object(obj))?;
            SiteInput { pages: vec![page], externals: Vec::new() }
        }
        _ => anyhow::bail!("{}: expected a page, a list of pages or a site object", file.display()),
    };
    Ok(site)
}

/// Run a whole build: ingest, index, check, write the artifact.
pub fn build_site(req: BuildRequest) -> Result<BuildOutput> {
    let site = collect_pages(&req.input)?;
    let mut config = req.config;
    config.externals.extend(site.externals);
    tracing::info!(input = %req.input.display(), pages = site.pages.len(), externals = config.externals.len(), "ingested pages");

    let site_root = req.site_root.or_else(|| req.input.is_dir().then(|| req.input.clone()));
    let mut ctx = BuildContext::new(config);
    if let Some(root) = site_root {
        ctx = ctx.with_output_root(root);
    }
    for page in site.pages {
        ctx.add_page(page);
    }
    let out = ctx.finish();

    save_index(&req.output, &out.index)?;
    tracing::info!(output = %req.output.display(), "index written");
    Ok(out)
}

/// Ranked sites for a prefix, read from a written artifact.
pub fn lookup(index: &Path, prefix: &str) -> Result<Vec<SiteEntry>> {
    let index = load_index(index)?;
    Ok(index.lookup(prefix).iter().filter_map(|&id| index.site(id).cloned()).collect())
}
