//! Driver layer for browser automation.
//!
//! This crate exposes the WebDriver session wrapper and the page/element
//! helpers the capture flow reads the dashboard through.
//!
//! - [`browser::driver::NotescrapeDriver`]: WebDriver client wrapper bound to a profile
//! - [`browser::page::NotescrapePage`]: navigation, source and element queries
//! - [`browser::stealth`]: launch arguments and JS evasions
//! - [`browser::wait`]: bounded polling with an explicit timed-out outcome
pub mod browser;
