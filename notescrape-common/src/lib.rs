//! Common types and utilities shared across notescrape crates.
//!
//! This crate defines the records produced by every extraction path, the
//! best-effort collection wrapper, observability helpers, and the shared
//! error type. It is intentionally lightweight so that all crates can depend
//! on it without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`NotebookRecord`]: a notebook scraped from live anchor elements
//! - [`TitleEntry`]: a notebook title recovered from a saved snapshot
//! - [`UuidOccurrence`]: one UUID match plus its surrounding text
//! - [`BestEffort`]: successes of a per-item pass plus a count of drops
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`NotescrapeError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use notescrape_common::BestEffort;
//!
//! let mut collected = BestEffort::default();
//! collected.push(1);
//! collected.drop_one();
//! collected.push(3);
//! assert_eq!(collected.items, vec![1, 3]);
//! assert_eq!(collected.dropped, 1);
//! ```
use std::time::Duration;
use uuid::Uuid;

pub mod observability;

/// A notebook discovered on the rendered dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookRecord {
    /// Path segment following `/notebook/`; usually a UUID but not guaranteed.
    pub id: String,
    /// Display title, possibly spanning several lines.
    pub title: String,
    /// Destination the record was derived from, when known.
    pub url: Option<String>,
}

/// A notebook title recovered from a `project-<uuid>-title` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub id: Uuid,
    pub title: String,
}

/// A single UUID match in a snapshot together with its context window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UuidOccurrence {
    pub uuid: String,
    pub context: String,
}

/// Outcome of attempting every item of a batch and keeping what succeeded.
///
/// Failures are not reported individually; only their number survives so
/// callers can log it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestEffort<T> {
    pub items: Vec<T>,
    pub dropped: usize,
}

impl<T> Default for BestEffort<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dropped: 0,
        }
    }
}

impl<T> BestEffort<T> {
    /// Record a success.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Record a failure.
    pub fn drop_one(&mut self) {
        self.dropped += 1;
    }
}

/// Error types used across the notescrape workspace.
#[derive(thiserror::Error, Debug)]
pub enum NotescrapeError {
    /// A bounded wait elapsed before its condition held.
    #[error("Timed out after {}s waiting for {what}", after.as_secs())]
    Timeout { what: &'static str, after: Duration },

    /// A driver (browser, WebDriver session) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Reading or writing a snapshot or report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`NotescrapeError`].
pub type Result<T> = std::result::Result<T, NotescrapeError>;
