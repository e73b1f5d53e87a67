//! Aggregation state and the bundle it is assembled into.

use serde::{Deserialize, Serialize};

/// Wire value of `src` for scripts without a `src` attribute.
pub const INLINE_SRC: &str = "inline";

/// One admitted stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssFile {
    pub url: String,
    pub content: String,
}

/// One admitted script; `src` is the absolute URL or `"inline"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsFile {
    pub src: String,
    pub content: String,
}

/// Terminal output of a harvest, serialized as the `/scrape` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub url: String,
    pub html: String,
    pub css_files: Vec<CssFile>,
    pub js_files: Vec<JsFile>,
    pub total_fetched_size: usize,
}

impl ResultBundle {
    /// Recompute the size from the contents; equals `total_fetched_size`.
    pub fn content_size(&self) -> usize {
        char_len(&self.html)
            + self.css_files.iter().map(|c| char_len(&c.content)).sum::<usize>()
            + self.js_files.iter().map(|j| char_len(&j.content)).sum::<usize>()
    }
}

/// Which list an admitted resource goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Stylesheet,
    Script,
}

/// Outcome of offering one resource to the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    OverBudget,
}

/// Running totals of one harvest. Never shared between requests.
#[derive(Debug)]
pub struct AggregationState {
    cap: usize,
    html: String,
    truncated: bool,
    total: usize,
    css: Vec<CssFile>,
    js: Vec<(Option<String>, String)>,
}

impl AggregationState {
    /// Seed the budget with the primary document, cut down to `cap` if needed.
    pub fn new(mut html: String, cap: usize) -> Self {
        let mut total = char_len(&html);
        let truncated = total > cap;
        if truncated {
            truncate_chars(&mut html, cap);
            total = cap;
        }
        Self {
            cap,
            html,
            truncated,
            total,
            css: Vec::new(),
            js: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the primary document was cut down to the cap.
    pub fn html_truncated(&self) -> bool {
        self.truncated
    }

    /// Append `content` if it fits under the cap; otherwise leave state as is.
    ///
    /// `source` is the resolved URL, or `None` for an inline script.
    pub fn try_admit(
        &mut self,
        kind: ResourceKind,
        source: Option<String>,
        content: String,
    ) -> Admission {
        let size = char_len(&content);
        if self.total + size > self.cap {
            return Admission::OverBudget;
        }
        self.total += size;
        match kind {
            ResourceKind::Stylesheet => self.css.push(CssFile {
                url: source.unwrap_or_default(),
                content,
            }),
            ResourceKind::Script => self.js.push((source, content)),
        }
        Admission::Admitted
    }

    pub fn css_count(&self) -> usize {
        self.css.len()
    }

    pub fn js_count(&self) -> usize {
        self.js.len()
    }

    /// Package the state into the response structure.
    pub fn into_bundle(self, url: impl Into<String>) -> ResultBundle {
        ResultBundle {
            url: url.into(),
            html: self.html,
            css_files: self.css,
            js_files: self
                .js
                .into_iter()
                .map(|(src, content)| JsFile {
                    src: src.unwrap_or_else(|| INLINE_SRC.to_string()),
                    content,
                })
                .collect(),
            total_fetched_size: self.total,
        }
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn truncate_chars(s: &mut String, max_chars: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
}
