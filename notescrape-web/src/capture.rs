use crate::notebooks::{collect_notebooks, NotebookAnchor};
use crate::protocol::{announce_login, write_error, write_notebook_block};
use anyhow::Result;
use notescrape_common::{NotebookRecord, NotescrapeError};
use notescrape_config::NotescrapeConfig;
use notescrape_drivers::browser::driver::NotescrapeDriver;
use notescrape_drivers::browser::page::{NotescrapeElement, NotescrapePage};
use notescrape_drivers::browser::stealth::LaunchOptions;
use notescrape_drivers::browser::wait::poll_until;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

const BLANK_PAGE: &str = "about:blank";

/// What a browser session must offer the capture flow.
#[async_trait::async_trait]
pub trait BrowserSession: Send + Sync {
    type Anchor: NotebookAnchor;

    async fn navigate(&self, url: &str) -> Result<()>;
    async fn current_url(&self) -> Result<String>;
    async fn page_source(&self) -> Result<String>;
    async fn find_anchors(&self, selector: &str) -> Result<Vec<Self::Anchor>>;
    async fn close(self) -> Result<()>;
}

/// Session backed by the fantoccini driver.
pub struct FantocciniSession {
    driver: NotescrapeDriver,
    page: NotescrapePage,
}

impl FantocciniSession {
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let driver = NotescrapeDriver::launch(options).await?;
        let page = NotescrapePage::new(driver.client.clone());
        Ok(Self { driver, page })
    }
}

#[async_trait::async_trait]
impl BrowserSession for FantocciniSession {
    type Anchor = NotescrapeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await
    }

    async fn current_url(&self) -> Result<String> {
        self.page.get_url().await
    }

    async fn page_source(&self) -> Result<String> {
        self.page.get_content().await
    }

    async fn find_anchors(&self, selector: &str) -> Result<Vec<NotescrapeElement>> {
        self.page.find_elements(selector).await
    }

    async fn close(self) -> Result<()> {
        self.driver.close().await
    }
}

/// Capture settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct CapturePlan {
    pub target_url: String,
    pub navigation_timeout: Duration,
    pub initial_settle: Duration,
    pub login_timeout: Duration,
    pub post_login_settle: Duration,
    pub poll_interval: Duration,
    pub auth_markers: Vec<String>,
    pub notebook_selector: String,
    pub notebook_path_marker: String,
    pub snapshot_path: PathBuf,
}

impl From<&NotescrapeConfig> for CapturePlan {
    fn from(cfg: &NotescrapeConfig) -> Self {
        let c = &cfg.capture;
        Self {
            target_url: c.target_url.clone(),
            navigation_timeout: Duration::from_secs(c.navigation_timeout_secs),
            initial_settle: Duration::from_secs(c.initial_settle_secs),
            login_timeout: Duration::from_secs(c.login_timeout_secs),
            post_login_settle: Duration::from_secs(c.post_login_settle_secs),
            poll_interval: Duration::from_millis(c.poll_interval_ms),
            auth_markers: c.auth_markers.clone(),
            notebook_selector: c.notebook_selector.clone(),
            notebook_path_marker: c.notebook_path_marker.clone(),
            snapshot_path: cfg.files.snapshot.clone(),
        }
    }
}

pub fn launch_options(cfg: &NotescrapeConfig) -> LaunchOptions {
    LaunchOptions {
        webdriver_url: cfg.browser.webdriver_url.clone(),
        profile_dir: cfg.browser.profile_dir.clone(),
        headless: cfg.browser.headless,
        extra_args: cfg.browser.extra_args.clone(),
    }
}

/// True when `url` looks like a sign-in redirect.
pub fn is_auth_redirect(url: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .any(|m| url.contains(m))
}

#[derive(Debug, Clone)]
pub struct CaptureReport {
    pub records: Vec<NotebookRecord>,
    /// Anchors that failed to read and were left out.
    pub dropped: usize,
    pub login_required: bool,
    pub snapshot_path: PathBuf,
}

/// Drive an already-open session through navigation, the login gate,
/// snapshotting and anchor extraction. Status lines go to `out`.
pub async fn scrape_notebooks<S, W>(
    session: &S,
    plan: &CapturePlan,
    out: &mut W,
) -> notescrape_common::Result<CaptureReport>
where
    S: BrowserSession,
    W: Write,
{
    writeln!(out, "Navigating to {} ...", plan.target_url)?;
    session.navigate(&plan.target_url).await?;

    poll_until(plan.navigation_timeout, plan.poll_interval, || async move {
        let url = session.current_url().await?;
        Ok(!url.is_empty() && url != BLANK_PAGE)
    })
    .await
    .into_result("navigation", plan.navigation_timeout)?;
    sleep(plan.initial_settle).await;

    let landed = session.current_url().await?;
    debug!(target: "capture.flow", url = %landed, "landed");

    let login_required = is_auth_redirect(&landed, &plan.auth_markers);
    if login_required {
        info!(target: "capture.login", url = %landed, "sign-in redirect detected; waiting for user");
        announce_login(out)?;

        let markers = &plan.auth_markers;
        let waited = poll_until(plan.login_timeout, plan.poll_interval, || async move {
            let url = session.current_url().await?;
            Ok(!is_auth_redirect(&url, markers))
        })
        .await
        .into_result("login", plan.login_timeout)?;

        info!(target: "capture.login", waited_secs = waited.as_secs(), "login completed");
        writeln!(out, "Login successful! Waiting for dashboard to load...")?;
        sleep(plan.post_login_settle).await;
    }

    writeln!(out, "Extracting notebooks...")?;
    let source = session.page_source().await?;
    std::fs::write(&plan.snapshot_path, &source)?;
    info!(
        target: "capture.snapshot",
        path = %plan.snapshot_path.display(),
        bytes = source.len(),
        "snapshot saved"
    );

    let anchors = session.find_anchors(&plan.notebook_selector).await?;
    let collected = collect_notebooks(&anchors, &plan.notebook_path_marker).await;
    write_notebook_block(out, &collected.items)?;

    Ok(CaptureReport {
        records: collected.items,
        dropped: collected.dropped,
        login_required,
        snapshot_path: plan.snapshot_path.clone(),
    })
}

/// Run the flow on `session`, then release it whatever happened.
///
/// Errors are printed to `out` and logged but never returned: callers get
/// `None` and the process is expected to exit normally.
pub async fn capture_with<S, W>(session: S, plan: &CapturePlan, out: &mut W) -> Option<CaptureReport>
where
    S: BrowserSession,
    W: Write,
{
    let result = scrape_notebooks(&session, plan, out).await;

    if let Err(err) = session.close().await {
        warn!(target: "capture.flow", error = %err, "closing browser failed");
    }

    match result {
        Ok(report) => {
            let _ = writeln!(out, "Done.");
            Some(report)
        }
        Err(err) => {
            error!(target: "capture.flow", error = %err, "capture failed");
            let _ = write_error(out, &err);
            None
        }
    }
}

/// Launch the configured browser and run the whole capture.
pub async fn capture<W: Write>(cfg: &NotescrapeConfig, out: &mut W) -> Option<CaptureReport> {
    let _ = writeln!(out, "Starting browser locally...");
    let session = match FantocciniSession::launch(&launch_options(cfg)).await {
        Ok(session) => session,
        Err(err) => {
            let err = NotescrapeError::from(err);
            error!(target: "capture.flow", error = %err, "browser launch failed");
            let _ = write_error(out, &err);
            return None;
        }
    };
    capture_with(session, &CapturePlan::from(cfg), out).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec!["signin".into(), "accounts.google.com".into()]
    }

    #[test]
    fn detects_google_sign_in_redirects() {
        assert!(is_auth_redirect(
            "https://accounts.google.com/v3/signin/identifier?continue=x",
            &markers()
        ));
        assert!(is_auth_redirect("https://example.test/signin", &markers()));
        assert!(!is_auth_redirect("https://notebooklm.google.com/", &markers()));
    }

    #[test]
    fn blank_markers_never_match() {
        assert!(!is_auth_redirect("https://notebooklm.google.com/", &["".into(), " ".into()]));
    }

    #[test]
    fn plan_uses_configured_timings() {
        let plan = CapturePlan::from(&NotescrapeConfig::default());
        assert_eq!(plan.navigation_timeout, Duration::from_secs(15));
        assert_eq!(plan.login_timeout, Duration::from_secs(300));
        assert_eq!(plan.poll_interval, Duration::from_millis(500));
        assert_eq!(plan.snapshot_path, PathBuf::from("tmp_page_source.html"));
    }
}
