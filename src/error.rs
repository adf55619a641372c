//! Error types for page access and report output.

use thiserror::Error;

/// Errors raised by a [`Page`](crate::Page) while navigating or querying.
#[derive(Debug, Error)]
pub enum PageError {
    /// The HTTP request itself failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The browser could not be launched or stopped responding.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// The browser configuration was rejected.
    #[error("invalid browser configuration: {0}")]
    BrowserConfig(String),

    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A CSS selector could not be parsed.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A query was made before any page was loaded.
    #[error("no page is loaded")]
    NotLoaded,
}

/// Errors raised while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
