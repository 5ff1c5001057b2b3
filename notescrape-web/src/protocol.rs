//! Line protocol spoken on stdout by the capture command. A supervising
//! process watches for these exact strings.

use notescrape_common::{NotebookRecord, NotescrapeError};
use std::io::{self, Write};

pub const LOGIN_REQUIRED: &str = "LOGIN_REQUIRED";
pub const LOGIN_PROMPT: &str =
    ">>> PLEASE LOG IN TO YOUR GOOGLE ACCOUNT IN THE BROWSER WINDOW THAT JUST OPENED! <<<";
pub const BLOCK_START: &str = "=== NOTEBOOKS ===";
pub const BLOCK_END: &str = "=== END ===";

/// Collapse a multi-line title onto one line.
pub fn clean_title(title: &str) -> String {
    title.replace('\n', " - ")
}

/// `- <title> (ID: <id>)`
pub fn entry_line(title: &str, id: impl std::fmt::Display) -> String {
    format!("- {} (ID: {})", clean_title(title), id)
}

/// Emit the login sentinel and prompt, flushed so a watcher sees them now.
pub fn announce_login<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{LOGIN_REQUIRED}")?;
    writeln!(out, "{LOGIN_PROMPT}")?;
    out.flush()
}

/// Emit the bracketed notebook list.
pub fn write_notebook_block<W: Write>(out: &mut W, records: &[NotebookRecord]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{BLOCK_START}")?;
    for record in records {
        writeln!(out, "{}", entry_line(&record.title, &record.id))?;
    }
    writeln!(out, "{BLOCK_END}")?;
    out.flush()
}

/// `Error occurred: <err>`, the single failure line of a capture run.
pub fn write_error<W: Write>(out: &mut W, err: &NotescrapeError) -> io::Result<()> {
    writeln!(out, "Error occurred: {err}")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_bracketed_and_titles_single_line() {
        let records = vec![
            NotebookRecord {
                id: "a1".into(),
                title: "Quarterly review\n12 sources".into(),
                url: None,
            },
            NotebookRecord {
                id: "b2".into(),
                title: "Untitled".into(),
                url: None,
            },
        ];
        let mut buf = Vec::new();
        write_notebook_block(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "\n=== NOTEBOOKS ===\n- Quarterly review - 12 sources (ID: a1)\n- Untitled (ID: b2)\n=== END ===\n"
        );
    }

    #[test]
    fn empty_block_still_has_sentinels() {
        let mut buf = Vec::new();
        write_notebook_block(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\n=== NOTEBOOKS ===\n=== END ===\n");
    }

    #[test]
    fn login_announcement_leads_with_sentinel() {
        let mut buf = Vec::new();
        announce_login(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some(LOGIN_REQUIRED));
    }

    #[test]
    fn error_line_shows_only_the_outer_context() {
        let err = NotescrapeError::from(
            anyhow::anyhow!("connection refused").context("connecting to WebDriver at http://localhost:9515"),
        );
        let mut buf = Vec::new();
        write_error(&mut buf, &err).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Error occurred: Driver error: connecting to WebDriver at http://localhost:9515\n"
        );
    }
}
