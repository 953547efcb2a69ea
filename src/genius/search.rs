//! Candidate Resolver: free-text query to an ordered list of song page URLs.

use super::api::GeniusApi;
use crate::error::Result;
use crate::http::Transport;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

/// A source of candidate song pages for a query.
#[async_trait]
pub trait CandidateSearch: Send + Sync {
    /// Short name used in logs (e.g. "web", "api")
    fn name(&self) -> &str;

    /// Candidate URLs in relevance order, at most the configured limit.
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

/// Site-restricted web search scraped from the engine's HTML result page.
pub struct WebSearch {
    transport: Arc<dyn Transport>,
    endpoint: String,
    site: String,
    limit: usize,
    link: Regex,
}

impl WebSearch {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
        site: impl Into<String>,
        limit: usize,
    ) -> std::result::Result<Self, regex::Error> {
        let site = site.into();
        // Plain links, plus links percent-encoded inside redirect wrappers
        let link = Regex::new(&format!(
            r#"(?i)https?(?::|%3A)(?://|%2F%2F)(?:www\.)?{}(?:/|%2F)[^\s"'<>&]*"#,
            regex::escape(&site)
        ))?;

        Ok(Self {
            transport,
            endpoint: endpoint.into(),
            site,
            limit,
            link,
        })
    }

    fn search_url(&self, query: &str) -> String {
        let terms = format!("site:{} {} lyrics", self.site, query);
        format!("{}?q={}&num=10", self.endpoint, urlencoding::encode(&terms))
    }

    /// Result links in page order, decoded, without query or fragment,
    /// de-duplicated and capped at the limit.
    fn extract_links(&self, page: &str) -> Vec<String> {
        let mut links: Vec<String> = Vec::new();

        for found in self.link.find_iter(page) {
            let decoded = urlencoding::decode(found.as_str())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| found.as_str().to_string());
            let url = decoded
                .split(['?', '#', '&'])
                .next()
                .unwrap_or_default()
                .to_string();

            if !has_page_path(&url) || links.contains(&url) {
                continue;
            }

            links.push(url);
            if links.len() == self.limit {
                break;
            }
        }

        links
    }
}

/// True when the URL points below the site root.
fn has_page_path(url: &str) -> bool {
    url.split("://")
        .nth(1)
        .and_then(|rest| rest.split_once('/'))
        .is_some_and(|(_, path)| !path.trim_matches('/').is_empty())
}

#[async_trait]
impl CandidateSearch for WebSearch {
    fn name(&self) -> &str {
        "web"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let page = self.transport.get_text(&self.search_url(query), None).await?;
        let links = self.extract_links(&page);
        debug!("Web search found {} candidate(s)", links.len());
        Ok(links)
    }
}

/// Candidate search through the Genius API `/search` endpoint.
pub struct ApiSearch {
    api: Arc<GeniusApi>,
    limit: usize,
}

impl ApiSearch {
    pub fn new(api: Arc<GeniusApi>, limit: usize) -> Self {
        Self { api, limit }
    }
}

#[async_trait]
impl CandidateSearch for ApiSearch {
    fn name(&self) -> &str {
        "api"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let mut urls = self.api.search(query).await?;
        urls.truncate(self.limit);
        Ok(urls)
    }
}

/// Turns a query (and optional explicit page URL) into candidate URLs.
pub struct CandidateResolver {
    search: Box<dyn CandidateSearch>,
}

impl CandidateResolver {
    pub fn new(search: Box<dyn CandidateSearch>) -> Self {
        Self { search }
    }

    pub async fn candidates(&self, query: &str, explicit_url: Option<&str>) -> Result<Vec<String>> {
        if let Some(url) = explicit_url {
            debug!("Using explicit page URL {}", url);
            return Ok(vec![url.to_string()]);
        }

        info!("Searching candidates for '{}' via {}", query, self.search.name());
        self.search.search(query).await
    }
}
