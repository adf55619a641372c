use clap::{ArgAction, Parser, ValueEnum};
use std::time::Duration;

use crate::checker::{CheckerConfig, SortMode, GITHUB_URL};
use crate::report::DEFAULT_OUTPUT;

/// Number of repositories checked when no count is given.
pub const DEFAULT_COUNT: usize = 10;

/// How pages are loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Render pages in Chromium, running their scripts.
    #[default]
    Chromium,
    /// Download the raw HTML only.
    Http,
}

/// GitHub repository license checker: searches repositories for a keyword
/// and reports description, language, stars, forks and license of each.
///
/// Values left out on the command line are asked for interactively.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Keyword to search repositories for.
    #[clap(short, long, env = "GLC_KEYWORD")]
    pub keyword: Option<String>,

    /// Number of search results to check.
    #[clap(short = 'n', long, value_name = "NUM", env = "GLC_COUNT")]
    pub count: Option<usize>,

    /// Result ordering requested from GitHub.
    #[clap(short, long, value_enum, env = "GLC_SORT")]
    pub sort: Option<SortMode>,

    /// Output file path for the JSON report.
    #[clap(short, long, default_value = DEFAULT_OUTPUT, env = "GLC_OUTPUT")]
    pub output: String,

    /// Save the JSON report without asking.
    #[clap(long, conflicts_with = "no_save")]
    pub save: bool,

    /// Never save the JSON report.
    #[clap(long)]
    pub no_save: bool,

    /// Root URL of the search provider.
    #[clap(long, default_value = GITHUB_URL, env = "GLC_BASE_URL")]
    pub base_url: String,

    /// Pause after the search page loads, in milliseconds.
    #[clap(long, default_value = "2000", env = "GLC_SEARCH_DELAY_MS")]
    pub search_delay_ms: u64,

    /// Pause between repositories, in milliseconds.
    #[clap(long, default_value = "1000", env = "GLC_FETCH_DELAY_MS")]
    pub fetch_delay_ms: u64,

    /// Pause after a repository page loads, in milliseconds.
    #[clap(long, default_value = "1000", env = "GLC_SETTLE_DELAY_MS")]
    pub settle_delay_ms: u64,

    /// Hide the progress bar.
    #[clap(long)]
    pub no_progress: bool,

    /// Page backend.
    #[clap(long, value_enum, default_value_t = Backend::Chromium, env = "GLC_BACKEND")]
    pub backend: Backend,

    /// Run Chromium without a window (`true` or `false`).
    #[clap(long, value_name = "BOOL", action = ArgAction::Set, env = "GLC_HEADLESS")]
    pub headless: Option<bool>,

    /// Show the Chromium window; overrides `--headless`.
    #[clap(long)]
    pub headful: bool,
}

impl Args {
    /// Whether missing values should be asked for on the terminal.
    pub fn interactive(&self) -> bool {
        self.keyword.is_none()
    }

    /// Headless mode from the command line or environment, if given.
    pub fn headless_choice(&self) -> Option<bool> {
        if self.headful {
            Some(false)
        } else {
            self.headless
        }
    }

    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            base_url: self.base_url.clone(),
            search_delay: Duration::from_millis(self.search_delay_ms),
            fetch_delay: Duration::from_millis(self.fetch_delay_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            show_progress: !self.no_progress,
        }
    }
}
