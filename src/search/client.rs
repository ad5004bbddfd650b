//! Web search client for DuckDuckGo's HTML results page.
//!
//! `GET {base_url}/html/?q=<query>` returns an ordinary results page. The
//! organic results are scraped into title, URL and snippet, and the first
//! `max_results` are flattened into plain text the model can read.

use reqwest::Client as HttpClient;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use super::config::SearchConfig;
use super::errors::SearchError;

/// Base used to resolve the relative and redirect links DuckDuckGo emits.
const LINK_BASE: &str = "https://duckduckgo.com/";

// ─── Parsed results ──────────────────────────────────────────────────────────

/// One organic search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Parse a results page, keeping at most `max_results` organic results.
///
/// Ads are skipped. A page with no results yields an empty list; a bot-check
/// page yields [`SearchError::Blocked`].
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);

    let challenge = selector("#challenge-form, .anomaly-modal__modal")?;
    if document.select(&challenge).next().is_some() {
        return Err(SearchError::Blocked);
    }

    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut results = Vec::new();
    for result in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }
        let Some(link) = result.select(&title_sel).next() else {
            continue;
        };
        let title = element_text(link);
        let Some(url) = link.value().attr("href").and_then(resolve_link) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url,
            snippet,
        });
    }

    Ok(results)
}

/// Render results as plain text for a tool-result turn.
pub fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{query}'.");
    }

    results
        .iter()
        .map(|r| {
            format!(
                "Title: {}\nURL: {}\nSnippet: {}\n",
                r.title, r.url, r.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse {
        reason: format!("invalid selector '{css}': {e:?}"),
    })
}

/// Element text with runs of whitespace collapsed to single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a result link to the target URL.
///
/// Links are usually `//duckduckgo.com/l/?uddg=<encoded target>&rut=...`
/// redirects; the target is taken from `uddg`. Direct links pass through.
fn resolve_link(href: &str) -> Option<String> {
    let url = Url::parse(LINK_BASE).ok()?.join(href.trim()).ok()?;

    if url.path().starts_with("/l/") {
        return url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }

    Some(url.to_string())
}

// ─── SearchClient ────────────────────────────────────────────────────────────

/// HTTP client for the HTML results endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: HttpClient,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(concat!("localchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Request {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/html/", self.config.base_url.trim_end_matches('/'))
    }

    /// Run a query and return the formatted results text.
    pub async fn search(&self, query: &str) -> Result<String, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        tracing::info!(query = %query, "web search");

        let response = self
            .http
            .get(self.endpoint())
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("timed out after {}s", self.config.timeout_secs)
                } else {
                    e.to_string()
                };
                SearchError::Request { reason }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SearchError::Request {
            reason: format!("failed to read response body: {e}"),
        })?;

        let results = parse_results(&body, self.config.max_results)?;
        tracing::debug!(query = %query, results = results.len(), "web search answered");

        Ok(format_results(query, &results))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
