//! # GitHub License Checker
//!
//! A Rust library for searching GitHub repositories by keyword and reporting
//! each result's description, primary language, star and fork counts and
//! license status.
//!
//! ## Main Components
//!
//! - [`LicenseChecker`]: runs the search and visits every matched repository
//! - [`Page`]: the page the checker drives; [`ChromiumPage`] renders with a real
//!   browser, [`HttpPage`] only downloads HTML
//! - [`extract`]: field extractors with per-field fallbacks
//! - [`report`]: console rendering and JSON export
//! - [`Args`]: command line arguments
//!
//! ## Example
//!
//! ```no_run
//! use github_license_checker_lib::{CheckerConfig, HttpPage, LicenseChecker, SortMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let page = HttpPage::new()?;
//!     let mut checker = LicenseChecker::new(page, CheckerConfig::default())?;
//!
//!     let records = checker.search_repositories("web framework", SortMode::Stars, 5).await;
//!     github_license_checker_lib::report::display_results(&records);
//!
//!     Ok(())
//! }
//! ```

mod args;
mod browser;
mod checker;
mod count;
mod error;
pub mod extract;
mod page;
mod prompt;
mod record;
pub mod report;

// Re-export main components for documentation and external use
pub use crate::args::{Args, Backend, DEFAULT_COUNT};
pub use crate::browser::ChromiumPage;
pub use crate::checker::{search_url, CheckerConfig, LicenseChecker, SortMode, GITHUB_URL};
pub use crate::count::parse_count;
pub use crate::error::{PageError, ReportError};
pub use crate::page::{Document, Element, HttpPage, Page, WaitUntil, DEFAULT_USER_AGENT};
pub use crate::prompt::Prompter;
pub use crate::record::{
    LicenseInfo, RepositoryRecord, DEFAULT_DESCRIPTION, DEFAULT_LANGUAGE, KEY_ERROR,
    KEY_LICENSE_FILE, KEY_NO_LICENSE,
};
