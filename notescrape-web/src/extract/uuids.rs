//! Diagnostic dump of every UUID-shaped token in a snapshot.

use notescrape_common::UuidOccurrence;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::LazyLock;
use tracing::debug;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

/// All occurrences of one distinct UUID value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UuidGroup {
    pub uuid: String,
    pub occurrences: Vec<UuidOccurrence>,
}

/// Slice of `text` extending up to `radius` characters either side of
/// `start..end`, cut short at the document edges.
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}

/// Group matches by value. Groups are ordered by first appearance; each
/// group lists every occurrence in document order.
pub fn scan_uuids(text: &str, radius: usize) -> Vec<UuidGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<UuidGroup> = Vec::new();

    for m in UUID_RE.find_iter(text) {
        let occurrence = UuidOccurrence {
            uuid: m.as_str().to_string(),
            context: context_window(text, m.start(), m.end(), radius).to_string(),
        };
        let slot = *index.entry(m.as_str()).or_insert_with(|| {
            groups.push(UuidGroup {
                uuid: m.as_str().to_string(),
                occurrences: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].occurrences.push(occurrence);
    }

    debug!(target: "extract.uuids", unique = groups.len(), "uuids scanned");
    groups
}

pub fn render_uuid_report(groups: &[UuidGroup]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} unique UUIDs.", groups.len());
    for group in groups {
        let _ = write!(out, "\n--- UUID: {} ---\n", group.uuid);
        for occurrence in &group.occurrences {
            let _ = writeln!(out, "Context: {}", occurrence.context);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_symmetric_in_the_middle() {
        let text = format!("{}XYZ{}", "a".repeat(150), "b".repeat(150));
        let w = context_window(&text, 150, 153, 100);
        assert_eq!(w, format!("{}XYZ{}", "a".repeat(100), "b".repeat(100)));
    }

    #[test]
    fn window_counts_characters_not_bytes() {
        let text = format!("{}XYZ{}", "é".repeat(5), "ü".repeat(5));
        let start = text.find('X').unwrap();
        let w = context_window(&text, start, start + 3, 2);
        assert_eq!(w, "ééXYZüü");
    }

    #[test]
    fn zero_radius_is_the_match_itself() {
        assert_eq!(context_window("abcXYZdef", 3, 6, 0), "XYZ");
    }

    #[test]
    fn uppercase_tokens_are_not_matched() {
        assert!(scan_uuids("11111111-AAAA-1111-1111-111111111111", 10).is_empty());
    }

    #[test]
    fn report_header_then_sections() {
        let groups = scan_uuids("x 11111111-1111-1111-1111-111111111111 y", 2);
        let report = render_uuid_report(&groups);
        assert_eq!(
            report,
            "Found 1 unique UUIDs.\n\n--- UUID: 11111111-1111-1111-1111-111111111111 ---\nContext: x 11111111-1111-1111-1111-111111111111 y\n"
        );
    }
}
