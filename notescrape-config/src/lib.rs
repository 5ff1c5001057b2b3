//! Loader for notescrape configuration with file + environment overlays.
//!
//! Every setting has a built-in default, so running without any file is the
//! normal case. Sources are layered as: defaults, then an optional YAML/TOML/JSON
//! file, then `NOTESCRAPE__SECTION__KEY` environment variables. String values
//! may reference other variables as `${VAR}`; those are expanded last.
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "NOTESCRAPE";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotescrapeConfig {
    pub browser: BrowserConfig,
    pub capture: CaptureConfig,
    pub files: FilesConfig,
    pub extract: ExtractConfig,
    pub logging: LoggingConfig,
}

/// How the WebDriver session is launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    /// Reused between runs so the session cookies survive.
    pub profile_dir: PathBuf,
    pub headless: bool,
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            profile_dir: PathBuf::from("./chrome_profile_notebooklm"),
            headless: false,
            extra_args: Vec::new(),
        }
    }
}

/// Timings and page conventions for the capture flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub target_url: String,
    pub navigation_timeout_secs: u64,
    pub initial_settle_secs: u64,
    pub login_timeout_secs: u64,
    pub post_login_settle_secs: u64,
    pub poll_interval_ms: u64,
    /// URL substrings that mean we were bounced to a sign-in page.
    pub auth_markers: Vec<String>,
    pub notebook_selector: String,
    pub notebook_path_marker: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_url: "https://notebooklm.google.com/".into(),
            navigation_timeout_secs: 15,
            initial_settle_secs: 3,
            login_timeout_secs: 300,
            post_login_settle_secs: 5,
            poll_interval_ms: 500,
            auth_markers: vec!["signin".into(), "accounts.google.com".into()],
            notebook_selector: "a[href*='/notebook/']".into(),
            notebook_path_marker: "/notebook/".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub snapshot: PathBuf,
    pub titles_report: PathBuf,
    pub uuids_report: PathBuf,
    pub inspect_report: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("tmp_page_source.html"),
            titles_report: PathBuf::from("final_notebooks.txt"),
            uuids_report: PathBuf::from("extracted_uuids.txt"),
            inspect_report: PathBuf::from("parsed_out.txt"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleStrategy {
    /// Textual pattern over the raw markup.
    #[default]
    Regex,
    /// Element query over a parsed document tree.
    Dom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub title_strategy: TitleStrategy,
    /// Characters kept on each side of a UUID match.
    pub context_radius: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title_strategy: TitleStrategy::Regex,
            context_radius: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogEncoding,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogEncoding::Text,
            stderr: false,
            filter: "info".into(),
        }
    }
}

impl NotescrapeConfig {
    fn validate(&self) -> Result<(), LoadError> {
        let c = &self.capture;
        if c.poll_interval_ms == 0 {
            return Err(LoadError::Invalid {
                field: "capture.poll_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if c.navigation_timeout_secs == 0 || c.login_timeout_secs == 0 {
            return Err(LoadError::Invalid {
                field: "capture.*_timeout_secs",
                reason: "timeouts must be greater than zero".into(),
            });
        }
        if c.auth_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(LoadError::Invalid {
                field: "capture.auth_markers",
                reason: "at least one non-empty marker is required".into(),
            });
        }
        if c.notebook_path_marker.is_empty() {
            return Err(LoadError::Invalid {
                field: "capture.notebook_path_marker",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring.
pub struct NotescrapeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for NotescrapeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl NotescrapeConfigLoader {
    /// Start from built-in defaults.
    ///
    /// ```
    /// use notescrape_config::NotescrapeConfigLoader;
    ///
    /// let config = NotescrapeConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.capture.target_url, "https://notebooklm.google.com/");
    /// assert_eq!(config.capture.login_timeout_secs, 300);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a file that must exist; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only if present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use notescrape_config::{NotescrapeConfigLoader, TitleStrategy};
    ///
    /// let cfg = NotescrapeConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// capture:
    ///   login_timeout_secs: 600
    /// extract:
    ///   title_strategy: dom
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.capture.login_timeout_secs, 600);
    /// assert_eq!(cfg.capture.navigation_timeout_secs, 15);
    /// assert_eq!(cfg.extract.title_strategy, TitleStrategy::Dom);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Environment overrides are applied last, so they win over any file.
    pub fn load(self) -> Result<NotescrapeConfig, LoadError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("capture.auth_markers")
                    .with_list_parse_key("browser.extra_args"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: NotescrapeConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}
