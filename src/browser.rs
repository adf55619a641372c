//! A [`Page`] driven by a real Chromium through the DevTools protocol.

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::error::PageError;
use crate::page::{Document, Element, Page, WaitUntil, DEFAULT_USER_AGENT};

/// Extra time granted after the load event when waiting for the network.
const NETWORK_IDLE_GRACE: Duration = Duration::from_millis(500);

/// One browser tab, rendered with JavaScript.
///
/// Queries run against a snapshot of the rendered DOM taken after each
/// navigation and refreshed by [`Page::settle`].
pub struct ChromiumPage {
    browser: Browser,
    handler: JoinHandle<()>,
    tab: chromiumoxide::Page,
    url: String,
    document: Option<Document>,
}

impl ChromiumPage {
    /// Launch Chromium and open a blank tab.
    pub async fn launch(headless: bool) -> Result<Self, PageError> {
        let mut builder = BrowserConfig::builder()
            .window_size(1366, 768)
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled");
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(PageError::BrowserConfig)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // Drive the DevTools connection in the background
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP message error (continuing): {}", e);
                }
            }
            debug!("CDP handler finished");
        });

        let tab = match browser.new_page("about:blank").await {
            Ok(tab) => tab,
            Err(e) => {
                handler.abort();
                return Err(e.into());
            }
        };
        tab.set_user_agent(DEFAULT_USER_AGENT).await?;

        info!("Launched Chromium (headless: {})", headless);
        Ok(ChromiumPage {
            browser,
            handler,
            tab,
            url: String::new(),
            document: None,
        })
    }

    /// Close the browser and stop the connection handler.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("Browser close error (ignored): {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser exit error (ignored): {}", e);
        }
        self.handler.abort();
    }

    /// Replace the document with the currently rendered DOM.
    async fn snapshot(&mut self) -> Result<(), PageError> {
        let html = self.tab.content().await?;
        if let Some(current) = self.tab.url().await? {
            self.url = current;
        }
        debug!("Snapshot of {} ({} bytes)", self.url, html.len());
        self.document = Some(Document::parse(&html));
        Ok(())
    }

    fn document(&self) -> Result<&Document, PageError> {
        self.document.as_ref().ok_or(PageError::NotLoaded)
    }
}

impl Drop for ChromiumPage {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

impl Page for ChromiumPage {
    async fn goto(&mut self, url: &str, wait: WaitUntil) -> Result<(), PageError> {
        debug!("Navigating to {} ({:?})", url, wait);
        self.document = None;
        self.url = url.to_string();

        // Resolves on the load event
        self.tab.goto(url).await?;
        if wait == WaitUntil::NetworkIdle {
            sleep(NETWORK_IDLE_GRACE).await;
        }

        self.snapshot().await
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, PageError> {
        self.document()?.select_first(selector)
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, PageError> {
        self.document()?.select_all(selector)
    }

    async fn settle(&mut self, delay: Duration) -> Result<(), PageError> {
        sleep(delay).await;
        // Scripts may have rendered more since the last snapshot
        self.snapshot().await
    }
}
