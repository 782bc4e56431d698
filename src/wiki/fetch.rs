// src/wiki/fetch.rs
// =============================================================================
// This module fetches pages from the MediaWiki Action API.
//
// Strategy:
// - Ask for a page's outbound article links via action=query & prop=links
// - Follow 'plcontinue' continuation tokens (the API pages its results,
//   500 links at a time)
// - Let the API resolve redirects for us (redirects=1), so we get the
//   canonical page title back
// - Optionally fall back to the search API's best guess when the exact
//   title doesn't exist (auto-suggest)
//
// Why the Action API and not scraping article HTML?
// - The API hands us exactly the link titles, already separated from
//   navigation chrome, in JSON
// - Scraping would break every time Wikipedia's markup shifts
//
// Rust concepts:
// - Traits as seams: the crawler depends on FetchPage, not on this client,
//   so tests can substitute a deterministic fake
// - serde derive: declarative JSON -> struct mapping
// - Loops with continuation tokens: a common API pagination pattern
// =============================================================================

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

// How long we wait for any single API request
const REQUEST_TIMEOUT_SECS: u64 = 10;

// A fetched page: its canonical title plus the article links it contains
#[derive(Debug, Clone)]
pub struct Page {
    /// The canonical title (after redirect resolution)
    pub title: String,
    /// Titles of the article-namespace pages this page links to
    pub links: Vec<String>,
}

// The page-fetch seam the crawler builds against
//
// The real implementation talks to Wikipedia; the crawl tests use an
// in-memory fake with a fixed title -> links mapping
pub trait FetchPage {
    /// Fetches a page and its outbound links, or fails (missing page,
    /// disambiguation page, network error)
    async fn fetch_page(&self, title: &str) -> Result<Page>;
}

// MediaWiki API client backed by reqwest
pub struct WikiClient {
    client: Client,
    api_url: Url,
    auto_suggest: bool,
}

impl WikiClient {
    // Creates a client for the given API endpoint
    //
    // Parameters:
    //   api_url: the Action API endpoint, e.g. "https://en.wikipedia.org/w/api.php"
    //   auto_suggest: when true, a missing title is retried once with the
    //                 search API's best suggestion
    pub fn new(api_url: &str, auto_suggest: bool) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| anyhow!("Invalid API URL '{}': {}", api_url, e))?;

        // Wikipedia asks API clients to send an identifying User-Agent;
        // the default reqwest one tends to get rejected
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("wikigraph/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url,
            auto_suggest,
        })
    }

    // Fetches all outbound article links for an exact title
    //
    // Returns:
    //   Ok(Some(page)) - page exists, links collected across all batches
    //   Ok(None)       - no page under this exact title
    //   Err            - network/HTTP error, or the title is a disambiguation page
    async fn query_links(&self, title: &str) -> Result<Option<Page>> {
        let mut canonical: Option<String> = None;
        let mut links: Vec<String> = Vec::new();
        let mut cont: Option<String> = None;

        loop {
            let body = self.links_batch(title, cont.as_deref()).await?;

            match extract_page(&body)? {
                None => return Ok(None),
                Some((batch_title, batch_links)) => {
                    // The canonical title is the same in every batch;
                    // remember the first one we see
                    canonical.get_or_insert(batch_title);
                    links.extend(batch_links);
                }
            }

            // The API signals "more links available" with a plcontinue token
            cont = body.cont.and_then(|c| c.plcontinue);
            if cont.is_none() {
                break;
            }
        }

        Ok(canonical.map(|title| Page { title, links }))
    }

    // One API round trip for a page's links
    async fn links_batch(&self, title: &str, cont: Option<&str>) -> Result<QueryResponse> {
        let mut params = vec![
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
            ("titles", title.to_string()),
            // pageprops rides along so we can spot disambiguation pages
            ("prop", "links|pageprops".to_string()),
            ("ppprop", "disambiguation".to_string()),
            // namespace 0 = articles only (no Talk:, File:, Category:, ...)
            ("plnamespace", "0".to_string()),
            ("pllimit", "max".to_string()),
            ("redirects", "1".to_string()),
        ];
        if let Some(token) = cont {
            params.push(("plcontinue", token.to_string()));
        }

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} from the MediaWiki API", response.status()));
        }

        let body = response.json::<QueryResponse>().await?;
        Ok(body)
    }

    // Asks the search API for its best guess at a misspelled title
    async fn search_title(&self, query: &str) -> Result<Option<String>> {
        let params = [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
            ("list", "search".to_string()),
            ("srsearch", query.to_string()),
            ("srlimit", "1".to_string()),
            ("srinfo", "suggestion".to_string()),
            ("srprop", String::new()),
        ];

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} from the MediaWiki API", response.status()));
        }

        let body = response.json::<SearchResponse>().await?;
        Ok(extract_suggestion(&body))
    }
}

impl FetchPage for WikiClient {
    async fn fetch_page(&self, title: &str) -> Result<Page> {
        // Try the exact title first
        if let Some(page) = self.query_links(title).await? {
            return Ok(page);
        }

        if !self.auto_suggest {
            return Err(anyhow!("Page '{}' does not exist", title));
        }

        // The exact title missed; retry once with the search API's best guess
        let suggestion = self.search_title(title).await?.ok_or_else(|| {
            anyhow!("Page '{}' does not exist and search found no suggestion", title)
        })?;
        println!("    (auto-suggest: '{}' -> '{}')", title, suggestion);

        match self.query_links(&suggestion).await? {
            Some(page) => Ok(page),
            None => Err(anyhow!("Suggested page '{}' does not exist", suggestion)),
        }
    }
}

// --- API response envelopes ---------------------------------------------------
// These mirror the JSON the Action API returns with formatversion=2.
// serde ignores fields we don't declare, so only what we read appears here.

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(rename = "continue")]
    cont: Option<Continuation>,
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct Continuation {
    plcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<PageBody>,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    title: String,
    // formatversion=2 marks nonexistent pages with "missing": true
    #[serde(default)]
    missing: bool,
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<PageLink>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    // Present (as an empty string) on disambiguation pages
    disambiguation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchBody>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    searchinfo: Option<SearchInfo>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchInfo {
    suggestion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

// Pulls (canonical_title, links_in_this_batch) out of one API response
//
// Returns:
//   Ok(None)      - the page doesn't exist
//   Ok(Some(...)) - page data for this batch
//   Err           - the title resolves to a disambiguation page
fn extract_page(body: &QueryResponse) -> Result<Option<(String, Vec<String>)>> {
    let page = match body.query.as_ref().and_then(|q| q.pages.first()) {
        Some(page) => page,
        None => return Ok(None),
    };

    if page.missing {
        return Ok(None);
    }

    let is_disambiguation = page
        .pageprops
        .as_ref()
        .map(|props| props.disambiguation.is_some())
        .unwrap_or(false);
    if is_disambiguation {
        return Err(anyhow!("'{}' is a disambiguation page", page.title));
    }

    let links = page.links.iter().map(|l| l.title.clone()).collect();
    Ok(Some((page.title.clone(), links)))
}

// Picks the best title out of a search response
//
// The API's spelling suggestion wins over the first search hit, matching
// how interactive "did you mean" behaves
fn extract_suggestion(body: &SearchResponse) -> Option<String> {
    let query = body.query.as_ref()?;
    if let Some(suggestion) = query.searchinfo.as_ref().and_then(|i| i.suggestion.clone()) {
        return Some(suggestion);
    }
    query.search.first().map(|hit| hit.title.clone())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is 'async fn' in a trait?
//    - Stable since Rust 1.75: trait methods can be async directly
//    - The crawler takes a generic F: FetchPage, so calls are statically
//      dispatched - no boxing, no dyn
//
// 2. What is #[serde(rename = "continue")]?
//    - 'continue' is a Rust keyword, so it can't be a field name
//    - rename tells serde which JSON key maps to our 'cont' field
//
// 3. What is #[serde(default)]?
//    - If the JSON key is absent, use the type's Default value
//    - The API simply omits "links" for pages without any, and "missing"
//      for pages that exist - default gives us vec![] and false
//
// 4. Why Option<T> all the way down the envelopes?
//    - The API omits whole sections depending on the request - e.g. no
//      "continue" object on the last batch
//    - Modeling them as Option means absence parses cleanly instead of
//      erroring
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page_with_links() {
        let body: QueryResponse = serde_json::from_str(
            r#"{
                "batchcomplete": true,
                "query": {
                    "pages": [{
                        "pageid": 123,
                        "ns": 0,
                        "title": "Missouri University of Science and Technology",
                        "links": [
                            {"ns": 0, "title": "Missouri"},
                            {"ns": 0, "title": "Rolla, Missouri"}
                        ]
                    }]
                }
            }"#,
        )
        .unwrap();
        let (title, links) = extract_page(&body).unwrap().unwrap();
        assert_eq!(title, "Missouri University of Science and Technology");
        assert_eq!(links, vec!["Missouri", "Rolla, Missouri"]);
    }

    #[test]
    fn test_extract_page_missing() {
        let body: QueryResponse = serde_json::from_str(
            r#"{"query": {"pages": [{"ns": 0, "title": "Nope", "missing": true}]}}"#,
        )
        .unwrap();
        assert!(extract_page(&body).unwrap().is_none());
    }

    #[test]
    fn test_extract_page_disambiguation_is_an_error() {
        let body: QueryResponse = serde_json::from_str(
            r#"{
                "query": {
                    "pages": [{
                        "ns": 0,
                        "title": "Mercury",
                        "pageprops": {"disambiguation": ""},
                        "links": [{"ns": 0, "title": "Mercury (Planet)"}]
                    }]
                }
            }"#,
        )
        .unwrap();
        let err = extract_page(&body).unwrap_err();
        assert!(err.to_string().contains("disambiguation"));
    }

    #[test]
    fn test_continuation_token_parses() {
        let body: QueryResponse = serde_json::from_str(
            r#"{
                "continue": {"plcontinue": "123|0|Next_Title", "continue": "||"},
                "query": {"pages": [{"ns": 0, "title": "Big Page", "links": []}]}
            }"#,
        )
        .unwrap();
        assert_eq!(
            body.cont.and_then(|c| c.plcontinue).as_deref(),
            Some("123|0|Next_Title")
        );
    }

    #[test]
    fn test_suggestion_prefers_searchinfo() {
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "query": {
                    "searchinfo": {"suggestion": "missouri s&t"},
                    "search": [{"ns": 0, "title": "Something Else"}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(extract_suggestion(&body).as_deref(), Some("missouri s&t"));
    }

    #[test]
    fn test_suggestion_falls_back_to_first_hit() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"query": {"search": [{"ns": 0, "title": "First Hit"}]}}"#,
        )
        .unwrap();
        assert_eq!(extract_suggestion(&body).as_deref(), Some("First Hit"));
    }

    #[test]
    fn test_suggestion_none_when_empty() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"query": {"search": []}}"#).unwrap();
        assert_eq!(extract_suggestion(&body), None);
    }

    #[test]
    fn test_client_rejects_invalid_api_url() {
        assert!(WikiClient::new("not a url", true).is_err());
    }
}
