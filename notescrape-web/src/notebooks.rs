//! Turning notebook anchors on the dashboard into [`NotebookRecord`]s.

use anyhow::Result;
use async_trait::async_trait;
use notescrape_common::{BestEffort, NotebookRecord};
use notescrape_drivers::browser::page::NotescrapeElement;
use std::collections::HashSet;
use tracing::{debug, info};

pub const UNTITLED: &str = "Untitled";

/// The three reads we need from an anchor element. Any of them may fail
/// when the element goes stale mid-pass.
#[async_trait]
pub trait NotebookAnchor: Send + Sync {
    async fn href(&self) -> Result<Option<String>>;
    async fn visible_text(&self) -> Result<String>;
    async fn aria_label(&self) -> Result<Option<String>>;
}

#[async_trait]
impl NotebookAnchor for NotescrapeElement {
    async fn href(&self) -> Result<Option<String>> {
        match self.get_property("href").await? {
            Some(resolved) if !resolved.is_empty() => Ok(Some(resolved)),
            _ => self.get_attribute("href").await,
        }
    }

    async fn visible_text(&self) -> Result<String> {
        self.get_inner_text().await
    }

    async fn aria_label(&self) -> Result<Option<String>> {
        self.get_attribute("aria-label").await
    }
}

/// Segment following `marker`, cut at the first `?` and then at the first `/`.
///
/// A fragment is not stripped: `/notebook/abc#x` yields `abc#x`.
///
/// Returns `None` when the marker is absent or the segment is empty.
///
/// ```
/// use notescrape_web::notebooks::derive_notebook_id;
///
/// let id = derive_notebook_id("https://x.test/notebook/abc123?foo=bar/extra", "/notebook/");
/// assert_eq!(id, Some("abc123"));
/// ```
pub fn derive_notebook_id<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = url.split_once(marker)?;
    let id = rest.split('?').next().unwrap_or_default();
    let id = id.split('/').next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

/// Visible text, then the accessibility label, then [`UNTITLED`].
///
/// Visible text is trimmed. The label is taken verbatim, so a whitespace-only
/// label is kept rather than replaced by [`UNTITLED`].
pub fn resolve_title(visible_text: &str, aria_label: Option<&str>) -> String {
    let text = visible_text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    match aria_label {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => UNTITLED.to_string(),
    }
}

async fn read_anchor<A: NotebookAnchor>(anchor: &A, marker: &str) -> Result<Option<NotebookRecord>> {
    let Some(url) = anchor.href().await? else {
        return Ok(None);
    };
    let Some(id) = derive_notebook_id(&url, marker) else {
        return Ok(None);
    };

    let text = anchor.visible_text().await?;
    let title = if text.trim().is_empty() {
        resolve_title(&text, anchor.aria_label().await?.as_deref())
    } else {
        resolve_title(&text, None)
    };

    let id = id.to_string();
    Ok(Some(NotebookRecord {
        id,
        title,
        url: Some(url),
    }))
}

/// Read every anchor, keeping the first record per id in document order.
///
/// Anchors that fail to read are dropped and counted; anchors that simply
/// do not point at a notebook are skipped without counting.
pub async fn collect_notebooks<A: NotebookAnchor>(anchors: &[A], marker: &str) -> BestEffort<NotebookRecord> {
    let mut out = BestEffort::default();
    let mut seen = HashSet::new();

    for (index, anchor) in anchors.iter().enumerate() {
        match read_anchor(anchor, marker).await {
            Ok(Some(record)) => {
                if seen.insert(record.id.clone()) {
                    out.push(record);
                }
            }
            Ok(None) => {}
            Err(err) => {
                debug!(target: "capture.anchors", index, error = %err, "anchor dropped");
                out.drop_one();
            }
        }
    }

    info!(
        target: "capture.anchors",
        anchors = anchors.len(),
        records = out.items.len(),
        dropped = out.dropped,
        "notebook anchors collected"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_trailing_segments() {
        let marker = "/notebook/";
        assert_eq!(
            derive_notebook_id("/notebook/abc123?foo=bar/extra", marker),
            Some("abc123")
        );
        assert_eq!(
            derive_notebook_id("https://notebooklm.google.com/notebook/f00d/sources", marker),
            Some("f00d")
        );
    }

    #[test]
    fn fragments_stay_part_of_the_id() {
        let marker = "/notebook/";
        assert_eq!(derive_notebook_id("/notebook/abc#x", marker), Some("abc#x"));
        assert_eq!(derive_notebook_id("/notebook/beef#top/sources", marker), Some("beef#top"));
    }

    #[test]
    fn no_marker_or_empty_segment_yields_none() {
        assert_eq!(derive_notebook_id("https://notebooklm.google.com/", "/notebook/"), None);
        assert_eq!(derive_notebook_id("/notebook/?x=1", "/notebook/"), None);
    }

    #[test]
    fn title_fallback_chain() {
        assert_eq!(resolve_title("  Alpha \n", Some("ignored")), "Alpha");
        assert_eq!(resolve_title("   ", Some("Research")), "Research");
        assert_eq!(resolve_title("", None), UNTITLED);
        assert_eq!(resolve_title("", Some("")), UNTITLED);
    }

    #[test]
    fn aria_label_is_not_trimmed() {
        assert_eq!(resolve_title("", Some("   ")), "   ");
        assert_eq!(resolve_title("\n", Some(" Beta ")), " Beta ");
    }
}
