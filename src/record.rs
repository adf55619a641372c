use serde::{Deserialize, Serialize};

pub const DEFAULT_DESCRIPTION: &str = "No description";
pub const DEFAULT_LANGUAGE: &str = "Unknown";

pub const KEY_LICENSE_FILE: &str = "license-file";
pub const KEY_NO_LICENSE: &str = "no-license";
pub const KEY_ERROR: &str = "error";

/// One scraped repository, as written to the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Display name, `owner/name`.
    pub repository: String,
    pub url: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub forks: u64,
    pub license: LicenseInfo,
}

/// License classification of a repository.
///
/// `key` is either a normalized license name or one of
/// [`KEY_LICENSE_FILE`], [`KEY_NO_LICENSE`] and [`KEY_ERROR`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub name: String,
    pub key: String,
    pub url: String,
}

impl LicenseInfo {
    /// A license named on the page, e.g. `"MIT license"` -> key `"mit-license"`.
    pub fn from_name(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            key: name.to_lowercase().replace(' ', "-"),
            url: url.to_string(),
        }
    }

    /// A license file exists but no license name was shown.
    pub fn license_file(url: String) -> Self {
        Self {
            name: "License file found".to_string(),
            key: KEY_LICENSE_FILE.to_string(),
            url,
        }
    }

    pub fn no_license() -> Self {
        Self {
            name: "No License".to_string(),
            key: KEY_NO_LICENSE.to_string(),
            url: String::new(),
        }
    }

    /// The lookup itself failed.
    pub fn error() -> Self {
        Self {
            name: "Error".to_string(),
            key: KEY_ERROR.to_string(),
            url: String::new(),
        }
    }

    /// True when no usable license could be established.
    pub fn is_missing(&self) -> bool {
        self.key == KEY_NO_LICENSE || self.key == KEY_ERROR
    }
}
