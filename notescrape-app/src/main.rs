use anyhow::Result;
use clap::Parser;
use commands::Command;
use notescrape_common::{
    NotescrapeError,
    observability::{LogConfig, LogFormat, init_logging},
};
use notescrape_config::{LogEncoding, NotescrapeConfig, NotescrapeConfigLoader};
use std::path::{Path, PathBuf};
mod commands;

const DEFAULT_CONFIG_FILE: &str = "notescrape.yaml";

/// Scrape notebook ids and titles from NotebookLM and from saved snapshots.
#[derive(Debug, Parser)]
#[command(name = "notescrape", version)]
struct Cli {
    /// Configuration file (YAML, TOML or JSON). Without it, `notescrape.yaml`
    /// in the current directory is used when present.
    #[arg(long, short, env = "NOTESCRAPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Load configuration, requiring `path` when one was given explicitly.
fn load_config(path: Option<&Path>) -> notescrape_common::Result<NotescrapeConfig> {
    let loader = NotescrapeConfigLoader::new();
    let loader = match path {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader
        .load()
        .map_err(|err| NotescrapeError::Config(err.to_string()))
}

fn log_config(cfg: &NotescrapeConfig) -> LogConfig {
    LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: match cfg.logging.format {
            LogEncoding::Text => LogFormat::Text,
            LogEncoding::Json => LogFormat::Json,
        },
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = load_config(cli.config.as_deref())?;

    init_logging(log_config(&cfg))?;
    tracing::info!(command = ?cli.command, "notescrape starting");

    commands::run(cli.command, &cfg).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommands_need_no_flags() {
        let expected = [
            ("capture", Command::Capture),
            ("titles", Command::Titles),
            ("uuids", Command::Uuids),
            ("inspect", Command::Inspect),
        ];
        for (name, command) in expected {
            let cli = Cli::try_parse_from(["notescrape", name]).expect(name);
            assert_eq!(cli.command, command);
        }
    }

    #[test]
    fn missing_config_file_is_a_configuration_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config(Some(&tmp.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, NotescrapeError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error: "));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notescrape.yaml");
        std::fs::write(&path, "extract:\n  context_radius: 40\n").unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.extract.context_radius, 40);
    }

    #[test]
    fn json_logging_maps_through() {
        let mut cfg = NotescrapeConfig::default();
        cfg.logging.format = LogEncoding::Json;
        cfg.logging.filter = "debug".into();
        let lc = log_config(&cfg);
        assert!(matches!(lc.format, LogFormat::Json));
        assert_eq!(lc.default_filter, "debug");
        assert_eq!(lc.app_name, "notescrape");
    }
}
