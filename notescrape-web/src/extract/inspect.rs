//! Quick look at what a snapshot actually contains, for when the other
//! extractors come back empty.

use regex::Regex;
use scraper::Html;
use std::fmt::Write;
use std::sync::LazyLock;

static PAGE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>(.*?)</title>").expect("title pattern is valid"));
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="([^"]+)""#).expect("href pattern is valid"));

const MAX_TEXTS: usize = 100;
const MAX_HREFS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub title: Option<String>,
    /// First non-blank text nodes, trimmed. Script and style bodies count.
    pub texts: Vec<String>,
    pub anchor_tags: usize,
    pub hrefs: Vec<String>,
}

pub fn summarize_page(html: &str) -> PageSummary {
    let title = PAGE_TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let document = Html::parse_document(html);
    let texts = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(MAX_TEXTS)
        .map(str::to_string)
        .collect();

    let hrefs = HREF_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .take(MAX_HREFS)
        .map(|m| m.as_str().to_string())
        .collect();

    PageSummary {
        title,
        texts,
        anchor_tags: html.matches("<a ").count(),
        hrefs,
    }
}

/// Quote `text` the way Python's `repr` does: single quotes unless the text
/// holds a `'` and no `"`.
fn quote_text(text: &str, out: &mut String) {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// `['a', 'b']`
fn list_repr(items: &[String]) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        quote_text(item, &mut out);
    }
    out.push(']');
    out
}

pub fn render_summary(summary: &PageSummary) -> String {
    format!(
        "Title of page: {}\nPage Texts (first {MAX_TEXTS}):\n{}\n\nNumber of a tags: {}\nHrefs:\n{}",
        summary.title.as_deref().unwrap_or("No title"),
        list_repr(&summary.texts),
        summary.anchor_tags,
        summary.hrefs.join("\n"),
    )
}

/// Body written in place of the summary when it cannot be produced.
pub fn render_failure(err: &dyn std::fmt::Display) -> String {
    format!("Error: {err}")
}
