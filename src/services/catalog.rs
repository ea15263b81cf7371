//! Repository search client.
//!
//! One bounded-timeout GET against the search endpoint, no retries. The
//! JSON envelope is reduced to a [`Catalog`] keyed by derived name.

use crate::config::SearchConfig;
use crate::domain::{Catalog, Insertion};
use crate::error::{FetchError, ParseError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::Path;

const CLIENT_USER_AGENT: &str = concat!("lint-sweep/", env!("CARGO_PKG_VERSION"));

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Search response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    clone_url: String,
}

/// Client for the repository search endpoint
pub struct CatalogFetcher {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl CatalogFetcher {
    /// Create a fetcher; the configured timeout covers the whole request
    pub fn new(search: &SearchConfig, token: &str) -> std::result::Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .timeout(search.timeout())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url: search.url.clone(),
            token: token.to_string(),
        })
    }

    fn headers(&self) -> std::result::Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("token {}", self.token))
            .map_err(|_| FetchError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        Ok(headers)
    }

    /// Query the endpoint and build the catalog rooted at `projects_dir`
    pub async fn fetch(&self, projects_dir: &Path) -> Result<Catalog> {
        tracing::info!(url = %self.url, "searching repositories");

        let response = self
            .client
            .get(self.url.as_str())
            .headers(self.headers()?)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        let catalog = parse_catalog(&body, projects_dir)?;

        tracing::info!(repositories = catalog.len(), "catalog fetched");
        Ok(catalog)
    }
}

/// Parse a search response body into a catalog
pub fn parse_catalog(body: &str, projects_dir: &Path) -> std::result::Result<Catalog, ParseError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let mut catalog = Catalog::new(projects_dir);
    for item in response.items {
        match catalog.insert(&item.clone_url) {
            Insertion::Added(_) => {}
            Insertion::Duplicate(name) => {
                tracing::debug!(repo = %name, url = %item.clone_url, "duplicate search result");
            }
            Insertion::Renamed { original, key } => {
                tracing::warn!(
                    repo = %original,
                    key = %key,
                    url = %item.clone_url,
                    "name already taken by another repository, using owner-qualified key"
                );
            }
            Insertion::Unnamed => {
                tracing::warn!(url = %item.clone_url, "cannot derive a name, skipping");
            }
        }
    }

    Ok(catalog)
}
