//! Notebook titles from `project-<uuid>-title` elements in a saved snapshot.

use crate::protocol::entry_line;
use notescrape_common::TitleEntry;
use notescrape_config::TitleStrategy;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};
use uuid::Uuid;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"id="project-([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})-title">\s*(.*?)\s*</span>"#,
    )
    .expect("title pattern is valid")
});

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[id^="project-"][id$="-title"]"#).expect("title selector is valid")
});

const ID_PREFIX: &str = "project-";
const ID_SUFFIX: &str = "-title";

/// Extract entries with the chosen strategy, in document order.
pub fn extract_titles(html: &str, strategy: TitleStrategy) -> Vec<TitleEntry> {
    let entries = match strategy {
        TitleStrategy::Regex => extract_titles_regex(html),
        TitleStrategy::Dom => extract_titles_dom(html),
    };
    debug!(target: "extract.titles", ?strategy, count = entries.len(), "titles extracted");
    entries
}

/// Textual match over the raw markup. Sensitive to attribute order and
/// to anything between the id attribute and the closing `>`.
pub fn extract_titles_regex(html: &str) -> Vec<TitleEntry> {
    TITLE_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let raw_id = caps.get(1)?.as_str();
            let id = match Uuid::parse_str(raw_id) {
                Ok(id) => id,
                Err(err) => {
                    warn!(target: "extract.titles", id = raw_id, error = %err, "unparseable id");
                    return None;
                }
            };
            Some(TitleEntry {
                id,
                title: caps.get(2)?.as_str().trim().to_string(),
            })
        })
        .collect()
}

/// Element query over the parsed document; text content is whitespace-normalised.
pub fn extract_titles_dom(html: &str) -> Vec<TitleEntry> {
    let document = Html::parse_document(html);
    document
        .select(&TITLE_SELECTOR)
        .filter_map(|element| {
            let raw_id = element
                .value()
                .id()?
                .strip_prefix(ID_PREFIX)?
                .strip_suffix(ID_SUFFIX)?;
            if raw_id.len() != 36 || raw_id.bytes().any(|b| b.is_ascii_uppercase()) {
                return None;
            }
            let id = Uuid::try_parse(raw_id).ok()?;
            let title = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            Some(TitleEntry { id, title })
        })
        .collect()
}

/// Report body: one `- <title> (ID: <uuid>)` line per entry, no trailing newline.
pub fn render_titles_report(entries: &[TitleEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry_line(&entry.title, entry.id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO: &str = r#"<div>
  <span id="project-11111111-1111-1111-1111-111111111111-title"> Alpha </span>
  <span id="project-22222222-2222-2222-2222-222222222222-title">
      Beta
  </span>
</div>"#;

    #[test]
    fn both_strategies_agree_on_well_formed_markup() {
        let regex = extract_titles(TWO, TitleStrategy::Regex);
        let dom = extract_titles(TWO, TitleStrategy::Dom);
        assert_eq!(regex, dom);
        assert_eq!(regex.len(), 2);
        assert_eq!(regex[0].title, "Alpha");
        assert_eq!(regex[1].title, "Beta");
    }

    #[test]
    fn regex_misses_reordered_attributes_but_dom_does_not() {
        let html = r#"<span id="project-33333333-3333-3333-3333-333333333333-title" class="t">Gamma</span>"#;
        assert!(extract_titles_regex(html).is_empty());
        let dom = extract_titles_dom(html);
        assert_eq!(dom.len(), 1);
        assert_eq!(dom[0].title, "Gamma");
    }

    #[test]
    fn non_uuid_ids_are_ignored() {
        let html = r#"<span id="project-not-a-uuid-title">Nope</span>"#;
        assert!(extract_titles_regex(html).is_empty());
        assert!(extract_titles_dom(html).is_empty());
    }

    #[test]
    fn duplicates_are_kept_in_document_order() {
        let html = r#"<span id="project-11111111-1111-1111-1111-111111111111-title">A</span><span id="project-11111111-1111-1111-1111-111111111111-title">B</span>"#;
        let titles: Vec<_> = extract_titles_regex(html).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }
}
