use crate::browser::stealth::StealthScripts;
use anyhow::Result;
use fantoccini::{elements::Element, Client, Locator};
use tracing::{debug, warn};

/// Page wrapper providing navigation and element queries.
#[derive(Clone)]
pub struct NotescrapePage {
    pub(crate) client: Client,
}

impl NotescrapePage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate to `url` and apply the automation evasions.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(anyhow::Error::from)?;

        // Pages that navigate away immediately can reject the script; that
        // is not a navigation failure.
        if let Err(err) = self
            .client
            .execute(StealthScripts::core_evasions(), vec![])
            .await
        {
            warn!(target: "browser.page", error = %err, "evasion script failed");
        }
        Ok(())
    }

    /// Return the full page HTML source.
    pub async fn get_content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    /// Return the current page URL.
    pub async fn get_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::from)
    }

    /// Find zero or more elements by CSS selector.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<NotescrapeElement>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        debug!(target: "browser.page", %selector, count = elements.len(), "elements matched");
        Ok(elements.into_iter().map(NotescrapeElement::new).collect())
    }
}

// ==============================
// NotescrapeElement
// ==============================

#[derive(Clone)]
/// Wrapper for DOM elements that provides typed helpers consistent with [`NotescrapePage`].
pub struct NotescrapeElement {
    pub element: Element,
}

impl NotescrapeElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// Read an attribute value as written in the markup.
    pub async fn get_attribute(&self, attribute: &str) -> Result<Option<String>> {
        self.element
            .attr(attribute)
            .await
            .map_err(anyhow::Error::from)
    }

    /// Read a DOM property; for `href` this is the resolved absolute URL.
    pub async fn get_property(&self, property: &str) -> Result<Option<String>> {
        self.element
            .prop(property)
            .await
            .map_err(anyhow::Error::from)
    }

    /// Return the element's visible text.
    pub async fn get_inner_text(&self) -> Result<String> {
        self.element.text().await.map_err(anyhow::Error::from)
    }
}
