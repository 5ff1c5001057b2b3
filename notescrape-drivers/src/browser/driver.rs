use crate::browser::stealth::{build_chrome_arguments, LaunchOptions};
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, info};
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client bound to a
/// persistent Chrome profile.
pub struct NotescrapeDriver {
    pub client: Client,
}

impl NotescrapeDriver {
    /// Connect to a running WebDriver service and start a session.
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let args = build_chrome_arguments(options);
        debug!(target: "browser.launch", ?args, "chrome arguments");

        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": args, "excludeSwitches": ["enable-automation"] }),
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .with_context(|| format!("connecting to WebDriver at {}", options.webdriver_url))?;

        info!(
            target: "browser.launch",
            webdriver = %options.webdriver_url,
            profile = %options.profile_dir.display(),
            "browser session started"
        );
        Ok(Self { client })
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
