//! # Search Module
//!
//! Scholarly web search through SerpAPI's Google Scholar engine.
//! It demonstrates:
//! - Trait objects as a seam for external services
//! - Async HTTP with reqwest and typed status handling
//! - Serde with optional fields for loosely-shaped JSON

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SearchError;

/// Default timeout for SerpAPI requests
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SEARCH HIT
// =============================================================================
/// One organic search result. Any field may be missing in the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub snippet: Option<String>,
}

impl SearchHit {
    /// `title (link): snippet`, with missing fields rendered empty.
    pub fn to_finding_line(&self) -> String {
        format!(
            "{} ({}): {}",
            self.title.as_deref().unwrap_or_default(),
            self.link.as_deref().unwrap_or_default(),
            self.snippet.as_deref().unwrap_or_default()
        )
    }
}

// =============================================================================
// SEARCH SERVICE TRAIT
// =============================================================================
/// A web or scholarly search returning hits in ranking order.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

// =============================================================================
// SERPAPI CLIENT
// =============================================================================
/// SerpAPI response body; only the parts the researcher reads.
#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SearchHit>,

    /// SerpAPI reports failures such as a bad key in this field
    #[serde(default)]
    error: Option<String>,
}

/// SerpAPI search client.
///
/// # Example
/// ```ignore
/// let search = SerpApiSearch::new("your-serpapi-key");
/// let hits = search.search("AI diagnostics").await?;
/// ```
#[derive(Clone)]
pub struct SerpApiSearch {
    api_key: String,
    base_url: String,
    engine: String,
    client: reqwest::Client,
}

impl SerpApiSearch {
    /// Create a client for the public SerpAPI endpoint and Google Scholar.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://serpapi.com".to_string(),
            engine: "google_scholar".to_string(),
            client: Self::build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Point the client at another endpoint root (`/search` is appended).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Set the per-request timeout. A zero duration keeps the default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.client = Self::build_client(timeout);
        }
        self
    }

    fn build_client(timeout: Duration) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client, falling back to defaults without a timeout");
                reqwest::Client::new()
            })
    }

    fn request_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&api_key={}&engine={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.engine)
        )
    }
}

#[async_trait]
impl SearchService for SerpApiSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        info!(query = %query, engine = %self.engine, "Performing scholarly search");

        let response = self
            .client
            .get(self.request_url(query))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::NetworkError(e)
                }
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "Search response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => SearchError::Unauthorized,
                429 => SearchError::RateLimited,
                code @ 500..=599 => SearchError::ServerError(code, body),
                code => SearchError::HttpError(code, body),
            });
        }

        let body: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| {
                // the client timeout also covers reading the body
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::ParseError(e.to_string())
                }
            })?;

        if let Some(message) = body.error {
            // SerpAPI answers "no results" with an error message and a 200
            if message.contains("hasn't returned any results") {
                warn!(query = %query, "No search results found");
                return Ok(Vec::new());
            }
            return Err(SearchError::Api(message));
        }

        if body.organic_results.is_empty() {
            warn!(query = %query, "No search results found");
        } else {
            info!(query = %query, count = body.organic_results.len(), "Search completed");
        }

        Ok(body.organic_results)
    }
}


/// HTTP tests against a mocked SerpAPI
#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_response() -> serde_json::Value {
        serde_json::json!({
            "search_metadata": { "status": "Success" },
            "organic_results": [
                {
                    "position": 0,
                    "title": "AI in medical imaging",
                    "link": "https://example.org/imaging",
                    "snippet": "Convolutional networks for radiology."
                },
                {
                    "position": 1,
                    "title": "Clinical decision support",
                    "snippet": "No link on this one."
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_http_successful_search() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "AI diagnostics"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("engine", "google_scholar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
            .mount(&mock_server)
            .await;

        let search = SerpApiSearch::new("test-key").with_base_url(mock_server.uri());
        let hits = search.search("AI diagnostics").await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title.as_deref(), Some("AI in medical imaging"));
        assert_eq!(hits[0].link.as_deref(), Some("https://example.org/imaging"));
        assert!(hits[1].link.is_none());
    }

    #[tokio::test]
    async fn test_http_missing_organic_results_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "search_metadata": {} })),
            )
            .mount(&mock_server)
            .await;

        let search = SerpApiSearch::new("test-key").with_base_url(mock_server.uri());
        assert!(search.search("obscure").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_unauthorized_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "error": "Invalid API key." })),
            )
            .mount(&mock_server)
            .await;

        let search = SerpApiSearch::new("bad-key").with_base_url(mock_server.uri());
        let result = search.search("test").await;

        assert!(matches!(result, Err(SearchError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_http_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
            .mount(&mock_server)
            .await;

        let search = SerpApiSearch::new("test-key").with_base_url(mock_server.uri());
        assert!(matches!(
            search.search("test").await,
            Err(SearchError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_http_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&mock_server)
            .await;

        let search = SerpApiSearch::new("test-key").with_base_url(mock_server.uri());
        match search.search("test").await {
            Err(SearchError::ServerError(code, body)) => {
                assert_eq!(code, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_slow_response_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(sample_response())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let search = SerpApiSearch::new("test-key")
            .with_base_url(mock_server.uri())
            .with_timeout(Duration::from_secs(1));

        assert!(matches!(
            search.search("AI diagnostics").await,
            Err(SearchError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_http_api_error_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "error": "Your account has run out of searches." })),
            )
            .mount(&mock_server)
            .await;

        let search = SerpApiSearch::new("test-key").with_base_url(mock_server.uri());
        match search.search("test").await {
            Err(SearchError::Api(message)) => assert!(message.contains("run out")),
            other => panic!("expected api error, got {:?}", other),
        }
    }
}
