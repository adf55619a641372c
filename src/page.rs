//! The browser-like page the checker drives.
//!
//! [`Page`] is the seam between the scraping logic and whatever fetches and
//! renders documents. [`HttpPage`] downloads the HTML with `reqwest`;
//! [`ChromiumPage`](crate::ChromiumPage) renders it in a real browser. Both
//! answer CSS queries with `scraper`.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::error::PageError;

/// Desktop browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// When a navigation is considered finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// The document has loaded.
    Load,
    /// No more network activity is expected.
    NetworkIdle,
}

/// A single page that can be navigated and queried with CSS selectors.
///
/// Queries always run against the most recently loaded document.
#[allow(async_fn_in_trait)]
pub trait Page {
    /// Load `url`, replacing the current document.
    async fn goto(&mut self, url: &str, wait: WaitUntil) -> Result<(), PageError>;

    /// URL of the current document, empty before the first navigation.
    fn url(&self) -> &str;

    /// First element matching `selector`, if any.
    fn query_selector(&self, selector: &str) -> Result<Option<Element>, PageError>;

    /// All elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, PageError>;

    /// Give the loaded page `delay` to finish rendering.
    ///
    /// Pages that render after load refresh their document afterwards.
    async fn settle(&mut self, delay: Duration) -> Result<(), PageError> {
        sleep(delay).await;
        Ok(())
    }
}

/// An owned snapshot of a matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    text: String,
    attributes: HashMap<String, String>,
    html: String,
}

impl Element {
    fn from_ref(element: ElementRef<'_>) -> Self {
        let text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let attributes = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Element {
            text,
            attributes,
            html: element.html(),
        }
    }

    /// Rendered text with runs of whitespace collapsed and trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First descendant (or the element itself) matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, PageError> {
        let selector = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.html);
        let found = fragment.select(&selector).next().map(Element::from_ref);
        Ok(found)
    }
}

/// A parsed HTML document.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Document {
            html: Html::parse_document(body),
        }
    }

    pub fn select_first(&self, selector: &str) -> Result<Option<Element>, PageError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).next().map(Element::from_ref))
    }

    pub fn select_all(&self, selector: &str) -> Result<Vec<Element>, PageError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).map(Element::from_ref).collect())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|e| PageError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// A [`Page`] backed by plain HTTP requests.
///
/// Both wait policies resolve once the whole response body has arrived,
/// since there is no script execution to wait for.
pub struct HttpPage {
    client: Client,
    url: String,
    document: Option<Document>,
}

impl HttpPage {
    /// Create a page that identifies itself with [`DEFAULT_USER_AGENT`].
    pub fn new() -> Result<Self, PageError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, PageError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(HttpPage {
            client,
            url: String::new(),
            document: None,
        })
    }

    fn document(&self) -> Result<&Document, PageError> {
        self.document.as_ref().ok_or(PageError::NotLoaded)
    }
}

impl Page for HttpPage {
    async fn goto(&mut self, url: &str, wait: WaitUntil) -> Result<(), PageError> {
        debug!("Navigating to {} ({:?})", url, wait);
        // A failed navigation must not leave the previous document queryable.
        self.document = None;
        self.url = url.to_string();

        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!("Loaded {} ({} bytes)", final_url, body.len());

        self.url = final_url;
        self.document = Some(Document::parse(&body));
        Ok(())
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
}
