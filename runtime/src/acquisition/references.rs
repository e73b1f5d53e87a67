//! Discover stylesheet and script references in raw HTML.
//!
//! Uses the `scraper` crate (html5ever underneath), which recovers from any
//! malformed markup, so extraction never fails. Each list keeps document order.

use scraper::{Html, Selector};
use url::Url;

/// A `<link rel="stylesheet">` with a resolved href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetRef {
    pub url: String,
}

/// A `<script>` element.
///
/// `source_url` is `None` for inline scripts, in which case `inline_body`
/// holds the element text (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    pub source_url: Option<String>,
    pub inline_body: Option<String>,
}

impl ScriptRef {
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            source_url: Some(url.into()),
            inline_body: None,
        }
    }

    pub fn inline(body: impl Into<String>) -> Self {
        Self {
            source_url: None,
            inline_body: Some(body.into()),
        }
    }
}

/// References found in one document, one ordered list per tag type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    pub stylesheets: Vec<StylesheetRef>,
    pub scripts: Vec<ScriptRef>,
}

impl References {
    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty() && self.scripts.is_empty()
    }
}

/// Extract stylesheet links and scripts from `html`, resolving against `base_url`.
pub fn extract_references(html: &str, base_url: &str) -> References {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    References {
        stylesheets: extract_stylesheets(&document, base.as_ref()),
        scripts: extract_scripts(&document, base.as_ref()),
    }
}

fn extract_stylesheets(document: &Html, base: Option<&Url>) -> Vec<StylesheetRef> {
    let sel = match Selector::parse("link[rel]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&sel)
        .filter(|el| is_stylesheet_rel(el.value().attr("rel").unwrap_or("")))
        .filter_map(|el| {
            let href = el.value().attr("href").filter(|h| !h.is_empty())?;
            match resolve(base, href) {
                Some(url) => Some(StylesheetRef { url }),
                None => {
                    tracing::debug!("dropping unresolvable stylesheet href {href:?}");
                    None
                }
            }
        })
        .collect()
}

/// `rel` is a token list; the match is exact and case-sensitive.
fn is_stylesheet_rel(rel: &str) -> bool {
    rel.split_ascii_whitespace().any(|token| token == "stylesheet")
}

fn extract_scripts(document: &Html, base: Option<&Url>) -> Vec<ScriptRef> {
    let sel = match Selector::parse("script") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut scripts = Vec::new();
    for el in document.select(&sel) {
        match el.value().attr("src").filter(|s| !s.is_empty()) {
            Some(src) => match resolve(base, src) {
                Some(url) => scripts.push(ScriptRef::external(url)),
                None => tracing::debug!("dropping unresolvable script src {src:?}"),
            },
            None => scripts.push(ScriptRef::inline(el.text().collect::<String>())),
        }
    }
    scripts
}

/// Standard relative-reference resolution; absolute hrefs need no base.
fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => Url::parse(href).ok().map(|u| u.to_string()),
    }
}
