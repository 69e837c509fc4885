//! Pulls searchable text, sections, links and asset references out of rendered
//! markup.

use crate::pipeline::PageInput;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref SEL_TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref SEL_H1: Selector = Selector::parse("h1").expect("valid selector");
    static ref SEL_BODY: Selector = Selector::parse("body").expect("valid selector");
    static ref SEL_PRIORITY: Selector = Selector::parse(r#"meta[name="search-priority"]"#).expect("valid selector");
    static ref SEL_HEAD_ASSETS: Selector = Selector::parse(
        r#"head link[rel~="stylesheet"][href], head link[rel~="icon"][href], head script[src]"#
    ).expect("valid selector");
    static ref SEL_CONTENT: Selector = Selector::parse("main, .page-content").expect("valid selector");
    static ref SEL_HEADINGS: Selector = Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid selector");
    static ref SEL_IDS: Selector = Selector::parse("[id]").expect("valid selector");
    static ref SEL_LINKS: Selector = Selector::parse("a[href]").expect("valid selector");
    static ref SEL_ONCLICK: Selector = Selector::parse("[onclick]").expect("valid selector");
    static ref SEL_ASSETS: Selector = Selector::parse(
        r#"img[src], script[src], source[src], link[rel~="stylesheet"][href], link[rel~="icon"][href]"#
    ).expect("valid selector");
    static ref ONCLICK_HREF: Regex = Regex::new(r#"location\.href\s*=\s*['"]([^'"]+)['"]"#).expect("valid regex");
}

/// A fragment-addressable part of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub heading: String,
    pub text: String,
}

/// Everything the pipeline needs from a page body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyScan {
    /// Text of the main content region (the whole body if there is none).
    pub text: String,
    pub sections: Vec<Section>,
    pub fragment_ids: Vec<String>,
    pub links: Vec<String>,
    pub assets: Vec<String>,
}

fn collapse(text: impl Iterator<Item = impl AsRef<str>>) -> String {
    let joined: String = text.fold(String::new(), |mut acc, t| {
        acc.push_str(t.as_ref());
        acc.push(' ');
        acc
    });
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: ElementRef<'_>) -> String { collapse(el.text()) }

fn is_heading(el: &ElementRef<'_>) -> bool {
    matches!(el.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn heading_id(heading: ElementRef<'_>) -> Option<String> {
    if let Some(id) = heading.value().attr("id") {
        return Some(id.to_string());
    }
    heading
        .children()
        .find_map(ElementRef::wrap)
        .and_then(|child| child.value().attr("id"))
        .map(str::to_string)
}

fn section_text(heading: ElementRef<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();
    for node in heading.next_siblings() {
        if let Some(el) = ElementRef::wrap(node) {
            if is_heading(&el) { break; }
            parts.push(element_text(el));
        } else if let Some(text) = node.value().as_text() {
            parts.push(text.to_string());
        }
    }
    collapse(parts.iter())
}

/// Scan a page body (a fragment of HTML).
pub fn scan_body(html: &str) -> BodyScan {
    let doc = Html::parse_fragment(html);

    let text = match doc.select(&SEL_CONTENT).next() {
        Some(content) => element_text(content),
        None => collapse(doc.root_element().text()),
    };

    let sections = doc
        .select(&SEL_HEADINGS)
        .filter_map(|h| {
            let id = heading_id(h)?;
            Some(Section { id, heading: element_text(h), text: section_text(h) })
        })
        .collect();

    let fragment_ids = doc
        .select(&SEL_IDS)
        .filter_map(|el| el.value().attr("id"))
        .map(str::to_string)
        .collect();

    let mut links: Vec<String> = doc
        .select(&SEL_LINKS)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();
    for el in doc.select(&SEL_ONCLICK) {
        if let Some(caps) = el.value().attr("onclick").and_then(|js| ONCLICK_HREF.captures(js)) {
            links.push(caps[1].to_string());
        }
    }

    let assets = doc
        .select(&SEL_ASSETS)
        .filter_map(|el| el.value().attr("src").or_else(|| el.value().attr("href")))
        .map(str::to_string)
        .collect();

    BodyScan { text, sections, fragment_ids, links, assets }
}

/// Build a [`PageInput`] from a complete rendered document.
///
/// The title comes from `<title>` without its ` | Site` suffix, falling back to
/// the first `<h1>`. Only `<head>` assets are collected here; the body is
/// scanned later by the pipeline.
pub fn parse_document(path: &str, html: &str) -> PageInput {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&SEL_TITLE)
        .next()
        .map(element_text)
        .map(|t| match t.rsplit_once(" | ") {
            Some((page, _site)) => page.trim().to_string(),
            None => t,
        })
        .filter(|t| !t.is_empty())
        .or_else(|| doc.select(&SEL_H1).next().map(element_text))
        .unwrap_or_default();

    let body = doc.select(&SEL_BODY).next().map(|b| b.inner_html()).unwrap_or_default();

    let priority = doc
        .select(&SEL_PRIORITY)
        .next()
        .and_then(|m| m.value().attr("content"))
        .and_then(|c| c.trim().parse().ok());

    let assets = doc
        .select(&SEL_HEAD_ASSETS)
        .filter_map(|el| el.value().attr("href").or_else(|| el.value().attr("src")))
        .map(str::to_string)
        .collect();

    PageInput {
        path: path.to_string(),
        title,
        body,
        priority,
        assets,
        ..PageInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html><html><head>
        <title>Spanish Olympiad in Informatics | VBaeza</title>
        <meta name="search-priority" content="30">
        <link rel="stylesheet" href="../styles.css?v=1">
        <script defer src="../scripts.js?v=1"></script>
        </head><body>
        <header><a href="../work" class="highlight">Work</a></header>
        <div class="page-content"><div class="content">
          <h1>Spanish Olympiad in Informatics</h1>
          <p>A yearly competition. See the <a href="/awards/ioi">IOI</a>.</p>
          <h2 id="diplomas">Diplomas</h2>
          <p>Silver in 2018.</p>
          <img src="../images/oie2018.jpg" alt="2018 Diploma">
          <h2><span id="medals">Medals</span></h2>
          <p>Gold in 2019.</p>
          <div class="card btn" onclick="location.href='/education/degree';">Degree</div>
        </div></div>
        <footer><a href="https://github.com/someone">GitHub</a></footer>
        </body></html>"#;

    #[test]
    fn document_metadata() {
        let page = parse_document("awards/oie", PAGE);
        assert_eq!(page.title, "Spanish Olympiad in Informatics");
        assert_eq!(page.priority, Some(30));
        assert_eq!(page.assets, vec!["../styles.css?v=1", "../scripts.js?v=1"]);
        assert!(page.body.contains("page-content"));
    }

    #[test]
    fn title_falls_back_to_h1() {
        let page = parse_document("index", "<html><body><h1>Vicent Baeza</h1></body></html>");
        assert_eq!(page.title, "Vicent Baeza");
        assert_eq!(page.priority, None);
    }

    #[test]
    fn body_sections_links_and_assets() {
        let page = parse_document("awards/oie", PAGE);
        let scan = scan_body(&page.body);

        assert!(scan.text.starts_with("Spanish Olympiad in Informatics A yearly competition."));
        assert!(!scan.text.contains("GitHub"));

        assert_eq!(scan.sections.len(), 2);
        assert_eq!(scan.sections[0], Section {
            id: "diplomas".into(),
            heading: "Diplomas".into(),
            text: "Silver in 2018.".into(),
        });
        assert_eq!(scan.sections[1].id, "medals");
        assert_eq!(scan.sections[1].heading, "Medals");
        assert!(scan.sections[1].text.starts_with("Gold in 2019."));

        assert_eq!(scan.fragment_ids, vec!["diplomas", "medals"]);
        assert_eq!(scan.links, vec!["../work", "/awards/ioi", "https://github.com/someone", "/education/degree"]);
        assert_eq!(scan.assets, vec!["../images/oie2018.jpg"]);
    }
}
