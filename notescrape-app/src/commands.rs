use anyhow::Result;
use clap::Subcommand;
use notescrape_config::NotescrapeConfig;
use notescrape_web::capture;
use notescrape_web::extract::{write_inspect_report, write_titles_report, write_uuid_report};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Open the browser, pass the login gate, save the page and list notebooks.
    Capture,
    /// List `project-<uuid>-title` entries from the saved snapshot.
    Titles,
    /// Dump every UUID in the saved snapshot with surrounding context.
    Uuids,
    /// Summarise the saved snapshot (title, text, links) for debugging.
    Inspect,
}

/// Dispatch one command.
///
/// `capture` reports its own failures on stdout and always returns `Ok`;
/// the snapshot extractors propagate I/O errors.
pub async fn run(command: Command, cfg: &NotescrapeConfig) -> Result<()> {
    let files = &cfg.files;
    match command {
        Command::Capture => {
            let mut stdout = std::io::stdout();
            if let Some(report) = capture::capture(cfg, &mut stdout).await {
                info!(
                    records = report.records.len(),
                    dropped = report.dropped,
                    login_required = report.login_required,
                    "capture finished"
                );
            }
        }
        Command::Titles => {
            write_titles_report(&files.snapshot, &files.titles_report, cfg.extract.title_strategy)?;
        }
        Command::Uuids => {
            write_uuid_report(&files.snapshot, &files.uuids_report, cfg.extract.context_radius)?;
        }
        Command::Inspect => {
            write_inspect_report(&files.snapshot, &files.inspect_report)?;
        }
    }
    Ok(())
}
