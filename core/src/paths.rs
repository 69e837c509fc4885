//! Canonical forms for link targets and asset references.
//!
//! Pages link to each other with whatever relative prefix the renderer needed
//! (`../work`, `/awards/oie`, `work/facephi.html#intro`). Everything here reduces
//! those to one comparable form: no traversal prefix, no surrounding slashes, no
//! `.html` suffix, with the site root spelled `/`.

/// Path of the site root.
pub const ROOT: &str = "/";
/// Path of the home page.
pub const HOME: &str = "index";

/// A link that stays inside the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLink {
    pub page: String,
    pub fragment: Option<String>,
}

/// True for `scheme:` targets (`https:`, `mailto:`, `tel:`) and `//host` ones.
///
/// A protocol-relative target is only external when its first segment is a
/// host name (has a `.`); `//about` is the local page `about`.
pub fn is_external(target: &str) -> bool {
    let target = target.trim();
    if let Some(rest) = target.strip_prefix("//") {
        let host = rest.split(['/', '?', '#']).next().unwrap_or("");
        return host.contains('.');
    }
    let head = target.split(['/', '?', '#']).next().unwrap_or("");
    head.contains(':')
}

fn strip_traversal(mut path: &str) -> &str {
    loop {
        let next = path
            .strip_prefix("../")
            .or_else(|| path.strip_prefix("./"))
            .or_else(|| path.strip_prefix('/'));
        match next {
            Some(rest) => path = rest,
            None => return path,
        }
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or("")
}

/// Canonical page path: `../work/` -> `work`, `/awards/oie.html` -> `awards/oie`, `` -> `/`.
pub fn canonical_page(path: &str) -> String {
    let path = strip_query(path.trim());
    if path == ".." || path == "." {
        return ROOT.to_string();
    }
    let path = strip_traversal(path).trim_matches('/');
    let path = path.strip_suffix(".html").unwrap_or(path);
    if path.is_empty() {
        ROOT.to_string()
    } else {
        path.to_string()
    }
}

/// Resolve a hyperlink emitted on `referrer`. `None` for external or empty targets.
pub fn parse_link(target: &str, referrer: &str) -> Option<LocalLink> {
    let target = target.trim();
    if target.is_empty() || is_external(target) {
        return None;
    }
    let (path, fragment) = match target.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment).filter(|f| !f.is_empty()).map(str::to_string)),
        None => (target, None),
    };
    let page = if path.is_empty() { canonical_page(referrer) } else { canonical_page(path) };
    Some(LocalLink { page, fragment })
}

/// File a local asset reference points at, relative to the output root.
/// `None` for external URLs and inline `data:` payloads.
pub fn asset_file(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || is_external(reference) {
        return None;
    }
    let file = strip_traversal(strip_query(reference));
    (!file.is_empty()).then(|| file.to_string())
}

/// File a hyperlink points at when it names a document rather than a page
/// (`docs/cv.pdf`). Targets without an extension, or ending in `.html`, are pages.
pub fn linked_file(target: &str) -> Option<String> {
    let file = asset_file(target)?;
    let name = file.rsplit('/').next().unwrap_or("");
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && !ext.eq_ignore_ascii_case("html") => Some(file),
        _ => None,
    }
}
