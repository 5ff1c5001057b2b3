//! Offline extractors over a saved page snapshot.
//!
//! Each `write_*` function reads the snapshot, renders its report and
//! overwrites the report file in one go.

pub mod inspect;
pub mod titles;
pub mod uuids;

use notescrape_common::Result;
use notescrape_config::TitleStrategy;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Write `final_notebooks.txt`-style output; returns the number of entries.
pub fn write_titles_report(snapshot: &Path, report: &Path, strategy: TitleStrategy) -> Result<usize> {
    let html = fs::read_to_string(snapshot)?;
    let entries = titles::extract_titles(&html, strategy);
    fs::write(report, titles::render_titles_report(&entries))?;
    info!(
        target: "extract.titles",
        report = %report.display(),
        entries = entries.len(),
        "titles report written"
    );
    Ok(entries.len())
}

/// Write the UUID dump; returns the number of distinct UUIDs.
pub fn write_uuid_report(snapshot: &Path, report: &Path, radius: usize) -> Result<usize> {
    let html = fs::read_to_string(snapshot)?;
    let groups = uuids::scan_uuids(&html, radius);
    fs::write(report, uuids::render_uuid_report(&groups))?;
    info!(
        target: "extract.uuids",
        report = %report.display(),
        unique = groups.len(),
        "uuid report written"
    );
    Ok(groups.len())
}

/// Write the page summary. A snapshot that cannot be read produces an
/// `Error: ...` report instead of an error; only failing to write the
/// report itself is returned.
pub fn write_inspect_report(snapshot: &Path, report: &Path) -> Result<()> {
    let body = match fs::read_to_string(snapshot) {
        Ok(html) => inspect::render_summary(&inspect::summarize_page(&html)),
        Err(err) => {
            warn!(target: "extract.inspect", snapshot = %snapshot.display(), error = %err, "snapshot unreadable");
            inspect::render_failure(&err)
        }
    };
    fs::write(report, body)?;
    Ok(())
}
