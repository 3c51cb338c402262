use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use crate::error::LookupError;

const USER_AGENT: &str = "Mozilla/5.0";

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnippet {
    pub title: String,
    pub snippet: String,
}

/// External web lookup: query in, ranked short snippets out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchSnippet>, LookupError>;
}

/// Scrapes the DuckDuckGo HTML endpoint.
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: super::http_client(timeout, Some(USER_AGENT)),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchSnippet>, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let results = parse_results(&body, limit)?;
        debug!(query, hits = results.len(), "Search completed");
        Ok(results)
    }
}

/// Extracts `(title, snippet)` pairs from a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, limit: usize) -> Result<Vec<SearchSnippet>, LookupError> {
    let selector = |s: &str| Selector::parse(s).map_err(|e| LookupError::Parse(e.to_string()));
    let result_sel = selector("div.result")?;
    let title_sel = selector("h2")?;
    let snippet_sel = selector("a.result__snippet")?;

    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for node in document.select(&result_sel) {
        let title = node.select(&title_sel).next().map(element_text);
        let snippet = node.select(&snippet_sel).next().map(element_text);
        if let (Some(title), Some(snippet)) = (title, snippet) {
            results.push(SearchSnippet { title, snippet });
            if results.len() >= limit {
                break;
            }
        }
    }

    Ok(results)
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join("")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
