#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use notescrape_common::observability::{LogConfig, LogFormat, init_logging};
use notescrape_web::capture::BrowserSession;
use notescrape_web::notebooks::NotebookAnchor;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

static INIT_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Route test logs to a file under the temp dir, echoed to stderr.
/// `NOTESCRAPE_LOG_FORMAT=json` switches the encoding.
pub fn init_test_tracing() -> &'static Path {
    INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "notescrape-tests",
            log_dir: Some(std::env::temp_dir().join("notescrape-tests")),
            emit_stderr: true,
            format: if std::env::var("NOTESCRAPE_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".into(),
        };

        init_logging(config).unwrap_or_default()
    })
}

/// Anchor with canned reads; `broken` makes every read fail.
#[derive(Clone, Default)]
pub struct FakeAnchor {
    pub href: Option<String>,
    pub text: String,
    pub aria_label: Option<String>,
    pub broken: bool,
}

impl FakeAnchor {
    pub fn new(href: &str, text: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn labelled(href: &str, label: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            aria_label: Some(label.to_string()),
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl NotebookAnchor for FakeAnchor {
    async fn href(&self) -> Result<Option<String>> {
        if self.broken {
            return Err(anyhow!("stale element reference"));
        }
        Ok(self.href.clone())
    }

    async fn visible_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn aria_label(&self) -> Result<Option<String>> {
        Ok(self.aria_label.clone())
    }
}

/// Session whose address advances through `urls` one poll at a time and
/// then stays on the last entry.
pub struct FakeSession {
    urls: Mutex<VecDeque<String>>,
    pub source: String,
    pub anchors: Vec<FakeAnchor>,
    pub fail_source: bool,
    pub closed: Arc<AtomicBool>,
}

impl FakeSession {
    pub fn new(urls: &[&str], source: &str, anchors: Vec<FakeAnchor>) -> Self {
        Self {
            urls: Mutex::new(urls.iter().map(|u| u.to_string()).collect()),
            source: source.to_string(),
            anchors,
            fail_source: false,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Anchor = FakeAnchor;

    async fn navigate(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let mut urls = self.urls.lock().unwrap();
        if urls.len() > 1 {
            Ok(urls.pop_front().unwrap())
        } else {
            urls.front().cloned().ok_or_else(|| anyhow!("no window"))
        }
    }

    async fn page_source(&self) -> Result<String> {
        if self.fail_source {
            return Err(anyhow!("session deleted"));
        }
        Ok(self.source.clone())
    }

    async fn find_anchors(&self, _selector: &str) -> Result<Vec<FakeAnchor>> {
        Ok(self.anchors.clone())
    }

    async fn close(self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Err(anyhow!("chromedriver already gone"))
    }
}
