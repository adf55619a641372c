//! Field extractors for a loaded repository page.
//!
//! GitHub's markup changes over time, so every field is looked up through an
//! ordered list of selector candidates. The first candidate that matches an
//! element and yields non-empty text wins; if none does, the field falls back
//! to its default.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::count::parse_count;
use crate::error::PageError;
use crate::page::{Element, Page};
use crate::record::{LicenseInfo, DEFAULT_DESCRIPTION, DEFAULT_LANGUAGE};

/// Leading non-digit run of a language label such as `"Python 85.2%"`.
static LANGUAGE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^0-9]+)").expect("language pattern is valid"));

/// A selector and how to read a value from the element it matches.
struct Candidate {
    selector: &'static str,
    read: fn(&Element) -> Option<String>,
}

const fn text(selector: &'static str) -> Candidate {
    Candidate {
        selector,
        read: inner_text,
    }
}

const DESCRIPTION: &[Candidate] = &[
    text(r##"[data-pjax="#repo-content-pjax-container"] p"##),
    text(".BorderGrid-cell p.f4"),
];

const LANGUAGE: &[Candidate] = &[
    Candidate {
        selector: r#"[data-view-component="true"] .Progress-item"#,
        read: language_from_aria_label,
    },
    text(r#"[data-view-component="true"] .ml-0 .color-fg-default"#),
];

const STARS: &[Candidate] = &[
    text("#repo-stars-counter-star"),
    text(r#"[data-view-component="true"] #repo-stars-counter-star"#),
    text(r#"a[href$="/stargazers"] strong"#),
    text(".js-social-count"),
];

const FORKS: &[Candidate] = &[
    text("#repo-network-counter"),
    text(r#"[data-view-component="true"] #repo-network-counter"#),
    text(r#"a[href$="/forks"] strong"#),
];

const LICENSE: &[Candidate] = &[
    Candidate {
        selector: r#"[data-view-component="true"] .Link--muted[href*="license"]"#,
        read: license_name,
    },
    Candidate {
        selector: ".octicon-law + .Link--muted",
        read: license_name,
    },
    Candidate {
        selector: r#"a[href$="/blob/main/LICENSE"]"#,
        read: license_name,
    },
    Candidate {
        selector: r#"a[href$="/blob/master/LICENSE"]"#,
        read: license_name,
    },
    Candidate {
        selector: ".BorderGrid-cell .octicon-law + *",
        read: license_name,
    },
];

/// License files looked for when no license name is shown.
const LICENSE_FILES: &[&str] = &["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING"];

/// GitHub's placeholder for licenses it could not identify.
const UNNAMED_LICENSE: &str = "View license";

fn inner_text(element: &Element) -> Option<String> {
    Some(element.text().to_string())
}

fn language_from_aria_label(element: &Element) -> Option<String> {
    element.attribute("aria-label").and_then(parse_language_label)
}

fn license_name(element: &Element) -> Option<String> {
    let name = element.text();
    (name != UNNAMED_LICENSE).then(|| name.to_string())
}

/// Extract the language name from a label such as `"Python 85.2%"`.
pub fn parse_language_label(label: &str) -> Option<String> {
    LANGUAGE_LABEL
        .captures(label.trim())
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Evaluate `candidates` in order and return the first usable hit.
fn first_match<P: Page>(
    page: &P,
    candidates: &[Candidate],
) -> Result<Option<(Element, String)>, PageError> {
    for candidate in candidates {
        // Missing selector: try the next one
        let Some(element) = page.query_selector(candidate.selector)? else {
            continue;
        };
        // Present but empty counts as missing
        if let Some(value) = (candidate.read)(&element) {
            let value = value.trim();
            if !value.is_empty() {
                let value = value.to_string();
                return Ok(Some((element, value)));
            }
        }
    }
    Ok(None)
}

fn text_or_default<P: Page>(page: &P, candidates: &[Candidate], field: &str, default: &str) -> String {
    match first_match(page, candidates) {
        Ok(Some((_, value))) => value,
        Ok(None) => {
            debug!("No {} found on {}", field, page.url());
            default.to_string()
        }
        Err(e) => {
            debug!("Failed to read {} on {}: {}", field, page.url(), e);
            default.to_string()
        }
    }
}

/// Repository description, or `"No description"`.
pub fn description<P: Page>(page: &P) -> String {
    text_or_default(page, DESCRIPTION, "description", DEFAULT_DESCRIPTION)
}

/// Primary language, or `"Unknown"`.
pub fn primary_language<P: Page>(page: &P) -> String {
    text_or_default(page, LANGUAGE, "language", DEFAULT_LANGUAGE)
}

pub fn stars<P: Page>(page: &P) -> u64 {
    // Empty text parses to 0
    parse_count(&text_or_default(page, STARS, "star count", ""))
}

pub fn forks<P: Page>(page: &P) -> u64 {
    parse_count(&text_or_default(page, FORKS, "fork count", ""))
}

/// License classification of the loaded repository.
///
/// A page without any license hint yields [`LicenseInfo::no_license`]; a
/// lookup that fails outright yields [`LicenseInfo::error`].
pub fn license<P: Page>(page: &P) -> LicenseInfo {
    match lookup_license(page) {
        Ok(license) => license,
        Err(e) => {
            warn!("Failed to read license on {}: {}", page.url(), e);
            LicenseInfo::error()
        }
    }
}

fn lookup_license<P: Page>(page: &P) -> Result<LicenseInfo, PageError> {
    // Named license in the sidebar or a LICENSE link
    if let Some((element, name)) = first_match(page, LICENSE)? {
        let href = element.attribute("href").unwrap_or("");
        return Ok(LicenseInfo::from_name(&name, href));
    }

    // Fall back to a license file in the file listing
    for file in LICENSE_FILES {
        if page.query_selector(&format!(r#"a[title="{}"]"#, file))?.is_some() {
            let url = format!("{}/blob/main/{}", page.url().trim_end_matches('/'), file);
            return Ok(LicenseInfo::license_file(url));
        }
    }

    Ok(LicenseInfo::no_license())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Document, WaitUntil};

    /// A page serving one fixed document.
    struct StaticPage {
        url: String,
        document: Document,
        broken: bool,
    }

    impl StaticPage {
        fn new(body: &str) -> Self {
            StaticPage {
                url: "https://github.com/owner/repo".to_string(),
                document: Document::parse(body),
                broken: false,
            }
        }

        fn broken() -> Self {
            StaticPage {
                broken: true,
                ..StaticPage::new("")
            }
        }
    }

    impl Page for StaticPage {
        async fn goto(&mut self, _url: &str, _wait: WaitUntil) -> Result<(), PageError> {
            Ok(())
        }

        fn url(&self) -> &str {
            &self.url
        }

        fn query_selector(&self, selector: &str) -> Result<Option<Element>, PageError> {
            if self.broken {
                return Err(PageError::NotLoaded);
            }
            self.document.select_first(selector)
        }

        fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, PageError> {
            if self.broken {
                return Err(PageError::NotLoaded);
            }
            self.document.select_all(selector)
        }
    }

    #[test]
    fn language_label_keeps_leading_name() {
        assert_eq!(parse_language_label("Python 85.2%").as_deref(), Some("Python"));
        assert_eq!(parse_language_label("Rust100%").as_deref(), Some("Rust"));
        assert_eq!(
            parse_language_label("Jupyter Notebook 12.0%").as_deref(),
            Some("Jupyter Notebook")
        );
        assert_eq!(parse_language_label("42%"), None);
        assert_eq!(parse_language_label(""), None);
    }

    #[test]
    fn reads_fields_from_repository_markup() {
        let page = StaticPage::new(
            r##"
            <div data-pjax="#repo-content-pjax-container"><p> A fast   web framework </p></div>
            <div data-view-component="true">
              <span class="Progress-item" aria-label="Go 97.1%"></span>
            </div>
            <span id="repo-stars-counter-star">12.5k</span>
            <span id="repo-network-counter">1,024</span>
            <div data-view-component="true">
              <a class="Link--muted" href="/owner/repo/blob/main/LICENSE">MIT license</a>
            </div>
            "##,
        );

        assert_eq!(description(&page), "A fast web framework");
        assert_eq!(primary_language(&page), "Go");
        assert_eq!(stars(&page), 12_500);
        assert_eq!(forks(&page), 1024);
        assert_eq!(
            license(&page),
            LicenseInfo {
                name: "MIT license".to_string(),
                key: "mit-license".to_string(),
                url: "/owner/repo/blob/main/LICENSE".to_string(),
            }
        );
    }

    #[test]
    fn later_candidates_fill_in() {
        let page = StaticPage::new(
            r#"
            <span id="repo-stars-counter-star">   </span>
            <a href="/owner/repo/stargazers"><strong>3m</strong></a>
            <a href="/owner/repo/forks"><strong>77</strong></a>
            <div data-view-component="true">
              <span class="Progress-item" aria-label="100%"></span>
              <div class="ml-0"><span class="color-fg-default">Haskell</span></div>
            </div>
            "#,
        );

        assert_eq!(stars(&page), 3_000_000);
        assert_eq!(forks(&page), 77);
        assert_eq!(primary_language(&page), "Haskell");
    }

    #[test]
    fn placeholder_license_name_falls_through_to_files() {
        let page = StaticPage::new(
            r#"
            <div data-view-component="true">
              <a class="Link--muted" href="/owner/repo/blob/main/license.txt">View license</a>
            </div>
            <a title="COPYING" href="/owner/repo/blob/main/COPYING">COPYING</a>
            "#,
        );

        assert_eq!(
            license(&page),
            LicenseInfo::license_file("https://github.com/owner/repo/blob/main/COPYING".into())
        );
    }

    #[test]
    fn empty_page_yields_defaults() {
        let page = StaticPage::new("<html><body><p>nothing here</p></body></html>");

        assert_eq!(description(&page), DEFAULT_DESCRIPTION);
        assert_eq!(primary_language(&page), DEFAULT_LANGUAGE);
        assert_eq!(stars(&page), 0);
        assert_eq!(forks(&page), 0);
        assert_eq!(
            license(&page),
            LicenseInfo {
                name: "No License".to_string(),
                key: "no-license".to_string(),
                url: String::new(),
            }
        );
    }

    #[test]
    fn failing_lookups_yield_defaults_and_license_error() {
        let page = StaticPage::broken();

        assert_eq!(description(&page), DEFAULT_DESCRIPTION);
        assert_eq!(primary_language(&page), DEFAULT_LANGUAGE);
        assert_eq!(stars(&page), 0);
        assert_eq!(forks(&page), 0);
        assert_eq!(
            license(&page),
            LicenseInfo {
                name: "Error".to_string(),
                key: "error".to_string(),
                url: String::new(),
            }
        );
    }
}
