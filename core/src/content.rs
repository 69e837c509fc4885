//! Editorial checks on a page body: unfinished or empty content.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref UNDER_CONSTRUCTION: Regex = Regex::new(r"(?i)under\s+construction").expect("valid regex");
    static ref TODO_MARKER: Regex = Regex::new(r"\bTODO\b").expect("valid regex");
    static ref CONTENT_ROOTS: Vec<Selector> = ["main", ".page-content .content", ".page-content"]
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect();
}

/// Warnings for a page body, in a fixed order. Only the main content region
/// is considered when the body has one (`main`, `.page-content`).
pub fn lint_body(html: &str) -> Vec<String> {
    let doc = Html::parse_fragment(html);
    let root = CONTENT_ROOTS
        .iter()
        .find_map(|sel| doc.select(sel).next())
        .unwrap_or_else(|| doc.root_element());
    let text: String = root.text().collect::<Vec<_>>().join(" ");

    let mut warnings = Vec::new();
    if text.trim().is_empty() {
        warnings.push("Empty content".to_string());
        return warnings;
    }
    if UNDER_CONSTRUCTION.is_match(&text) {
        warnings.push("Under construction".to_string());
    }
    if TODO_MARKER.is_match(&text) {
        warnings.push("Leftover TODO marker".to_string());
    }
    if let Some(trailing) = trailing_heading(root) {
        warnings.push(trailing);
    }
    warnings
}

/// A body whose last element is a heading or section title has an empty tail.
fn trailing_heading(root: ElementRef<'_>) -> Option<String> {
    let last = root.children().filter_map(ElementRef::wrap).last()?;
    let name = last.value().name();
    if matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
        return Some(format!("Empty <{name}>"));
    }
    last.value().classes().any(|c| c == "section").then(|| "Empty section".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bodies() {
        assert_eq!(lint_body(""), vec!["Empty content"]);
        assert_eq!(lint_body("<div class=\"content\">  </div>"), vec!["Empty content"]);
        assert_eq!(
            lint_body(r#"<header><a href="work">Work</a></header><div class="page-content"><div class="content"></div></div>"#),
            vec!["Empty content"]
        );
    }

    #[test]
    fn unfinished_markers() {
        assert_eq!(lint_body("<p>Under construction</p>"), vec!["Under construction"]);
        assert_eq!(lint_body("<p>TODO: add the diploma</p>"), vec!["Leftover TODO marker"]);
        assert!(lint_body("<p>Things to do</p>").is_empty());
    }

    #[test]
    fn dangling_headings() {
        assert_eq!(lint_body("<p>Intro</p><h2>Diplomas</h2>"), vec!["Empty <h2>"]);
        assert_eq!(
            lint_body(r#"<p>Intro</p><div class="section"><div class="section-title">side projects</div></div>"#),
            vec!["Empty section"]
        );
        assert!(lint_body("<h2>Diplomas</h2><p>Gold</p>").is_empty());
    }
}
