use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::PageError;
use crate::extract;
use crate::page::{Element, Page, WaitUntil};
use crate::record::RepositoryRecord;

pub const GITHUB_URL: &str = "https://github.com";

/// One entry per repository on the search results page.
const RESULT_ENTRIES: &str = r#"[data-testid="results-list"] .search-title"#;

/// Ordering requested from the search provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    #[default]
    Stars,
    Forks,
    Updated,
    BestMatch,
}

impl SortMode {
    /// Value of the `s` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            SortMode::Stars => "stars",
            SortMode::Forks => "forks",
            SortMode::Updated => "updated",
            SortMode::BestMatch => "best-match",
        }
    }

    /// Map an interactive menu choice (`"1"`..`"4"`) to a sort mode.
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(SortMode::Stars),
            "2" => Some(SortMode::Forks),
            "3" => Some(SortMode::Updated),
            "4" => Some(SortMode::BestMatch),
            _ => None,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Build the repository search URL for `keyword`.
///
/// Any path on `base` is kept, so `https://host/github` searches under
/// `https://host/github/search`.
pub fn search_url(base: &str, keyword: &str, sort: SortMode) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base)?;
    // Without a trailing slash `join` would replace the last path segment
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base.join("search")?;
    url.query_pairs_mut()
        .append_pair("q", keyword)
        .append_pair("type", "repositories")
        .append_pair("s", sort.as_query())
        .append_pair("o", "desc");
    Ok(url)
}

/// Timings and presentation of a run.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Provider root that search and repository links resolve against.
    pub base_url: String,
    /// Pause after the search page loads.
    pub search_delay: Duration,
    /// Pause after each repository.
    pub fetch_delay: Duration,
    /// Pause after a repository page loads, before extraction.
    pub settle_delay: Duration,
    pub show_progress: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            base_url: GITHUB_URL.to_string(),
            search_delay: Duration::from_secs(2),
            fetch_delay: Duration::from_secs(1),
            settle_delay: Duration::from_secs(1),
            show_progress: true,
        }
    }
}

/// Searches repositories and collects their license records.
///
/// The checker owns the page for its whole lifetime; extractors only borrow
/// it while a repository page is loaded.
pub struct LicenseChecker<P: Page> {
    page: P,
    base: Url,
    config: CheckerConfig,
}

impl<P: Page> LicenseChecker<P> {
    pub fn new(page: P, config: CheckerConfig) -> Result<Self, PageError> {
        let base = Url::parse(&config.base_url)?;
        Ok(LicenseChecker { page, base, config })
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Give the page back, ending the session.
    pub fn into_page(self) -> P {
        self.page
    }

    /// Search for `keyword` and collect records for up to `count` results.
    ///
    /// Repositories that fail to load are left out. A search page that fails
    /// to load yields no records at all.
    pub async fn search_repositories(
        &mut self,
        keyword: &str,
        sort: SortMode,
        count: usize,
    ) -> Vec<RepositoryRecord> {
        info!("Searching repositories for '{}' (sort: {})", keyword, sort);

        match self.try_search(keyword, sort, count).await {
            Ok(records) => records,
            Err(e) => {
                error!("Search for '{}' failed: {}", keyword, e);
                Vec::new()
            }
        }
    }

    async fn try_search(
        &mut self,
        keyword: &str,
        sort: SortMode,
        count: usize,
    ) -> Result<Vec<RepositoryRecord>, PageError> {
        let url = search_url(self.base.as_str(), keyword, sort)?;
        debug!("Requesting URL: {}", url);

        // Load the results page and give it time to settle
        self.page.goto(url.as_str(), WaitUntil::NetworkIdle).await?;
        self.page.settle(self.config.search_delay).await?;

        // Entries come back in the provider's order; no local re-sorting
        let entries = self.page.query_selector_all(RESULT_ENTRIES)?;
        let total = entries.len().min(count);
        debug!("Found {} result entries, taking {}", entries.len(), total);

        // Create progress display
        let pb = self.progress_bar(total);
        let mut records = Vec::with_capacity(total);

        for (index, entry) in entries.iter().take(count).enumerate() {
            // Entries without a link or name still use up a slot
            let (url, name) = match self.resolve_entry(entry) {
                Ok(Some(resolved)) => resolved,
                Ok(None) => {
                    debug!("Skipping result {} without a usable link", index + 1);
                    pb.inc(1);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping result {}: {}", index + 1, e);
                    pb.inc(1);
                    continue;
                }
            };

            info!("({}/{}) Processing {}", index + 1, total, name);
            pb.set_message(name.clone());

            // A repository that fails to load is dropped, not defaulted
            match self.repository_details(&url, &name).await {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping {}: {}", name, e),
            }
            pb.inc(1);

            // Pace requests to the provider
            sleep(self.config.fetch_delay).await;
        }

        pb.finish_and_clear();
        info!("Collected {} of {} repositories for '{}'", records.len(), total, keyword);
        Ok(records)
    }

    /// Absolute URL and display name of one search result.
    fn resolve_entry(&self, entry: &Element) -> Result<Option<(String, String)>, PageError> {
        let Some(link) = entry.query_selector("a")? else {
            return Ok(None);
        };

        let name = link.text();
        let href = link.attribute("href").map(str::trim).unwrap_or("");
        if name.is_empty() || href.is_empty() {
            return Ok(None);
        }

        // Result links are usually root-relative
        let url = self.base.join(href)?;
        Ok(Some((url.to_string(), name.to_string())))
    }

    /// Load one repository page and extract its record.
    ///
    /// Fails only when the page cannot be loaded; missing fields fall back to
    /// their defaults.
    pub async fn repository_details(
        &mut self,
        url: &str,
        name: &str,
    ) -> Result<RepositoryRecord, PageError> {
        self.page.goto(url, WaitUntil::NetworkIdle).await?;
        self.page.settle(self.config.settle_delay).await?;

        // Every extractor falls back to its own default
        let page = &self.page;
        Ok(RepositoryRecord {
            repository: name.to_string(),
            url: url.to_string(),
            description: extract::description(page),
            language: extract::primary_language(page),
            stars: extract::stars(page),
            forks: extract::forks(page),
            license: extract::license(page),
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {wide_msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}
