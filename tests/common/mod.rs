#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use github_license_checker_lib::{Document, Element, Page, PageError, WaitUntil};

/// What a fixture URL answers with.
enum Response {
    Html(String),
    Status(u16),
}

/// An in-memory site: URLs map to HTML bodies or failing statuses.
#[derive(Default)]
pub struct FixturePage {
    responses: HashMap<String, Response>,
    broken_queries: HashSet<String>,
    url: String,
    document: Option<Document>,
    pub visited: Vec<String>,
}

impl FixturePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses.insert(url.to_string(), Response::Html(body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Response::Status(status));
        self
    }

    /// Make every query on `url` fail once it is loaded.
    pub fn with_broken_queries(mut self, url: &str, body: impl Into<String>) -> Self {
        self.broken_queries.insert(url.to_string());
        self.with_html(url, body)
    }

    fn loaded(&self) -> Result<&Document, PageError> {
        if self.broken_queries.contains(&self.url) {
            return Err(PageError::NotLoaded);
        }
        self.document.as_ref().ok_or(PageError::NotLoaded)
    }
}

impl Page for FixturePage {
    async fn goto(&mut self, url: &str, _wait: WaitUntil) -> Result<(), PageError> {
        self.visited.push(url.to_string());
        self.document = None;
        self.url = url.to_string();

        match self.responses.get(url) {
            Some(Response::Html(body)) => {
                self.document = Some(Document::parse(body));
                Ok(())
            }
            Some(Response::Status(status)) => Err(PageError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(PageError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, PageError> {
        self.loaded()?.select_first(selector)
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, PageError> {
        self.loaded()?.select_all(selector)
    }
}

/// A search results page listing `entries` as `(href, name)` pairs.
pub fn search_page(entries: &[(&str, &str)]) -> String {
    let items: String = entries
        .iter()
        .map(|(href, name)| {
            format!(
                r#"<div class="search-title"><a href="{}"><span>{}</span></a></div>"#,
                href, name
            )
        })
        .collect();

    format!(
        r#"<html><body><div data-testid="results-list">{}</div></body></html>"#,
        items
    )
}

/// A repository page with every field present.
pub fn repository_page(description: &str, language: &str, stars: &str, forks: &str, license: &str) -> String {
    format!(
        r##"<html><body>
        <div data-pjax="#repo-content-pjax-container"><p>{description}</p></div>
        <ul>
          <li><span id="repo-stars-counter-star">{stars}</span></li>
          <li><span id="repo-network-counter">{forks}</span></li>
        </ul>
        <div class="BorderGrid-cell">
          <svg class="octicon octicon-law"></svg>
          <a class="Link--muted" href="/blob/main/LICENSE">{license}</a>
        </div>
        <div data-view-component="true">
          <span class="Progress-item" aria-label="{language} 88.4%"></span>
        </div>
        </body></html>"##
    )
}

/// A repository page without any license hint.
pub fn unlicensed_page(description: &str) -> String {
    format!(
        r##"<html><body>
        <div data-pjax="#repo-content-pjax-container"><p>{description}</p></div>
        <a title="README.md" href="/blob/main/README.md">README.md</a>
        </body></html>"##
    )
}
