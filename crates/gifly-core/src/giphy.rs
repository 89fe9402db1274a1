//! Giphy search API client.

use rand::Rng;
use serde::Deserialize;

use crate::config::GiphyConfig;
use crate::error::{GiflyError, Result};

const GIPHY_API_BASE: &str = "https://api.giphy.com";

const USER_AGENT: &str = concat!("gifly/", env!("CARGO_PKG_VERSION"));

/// Content rating cap for returned GIFs.
const RATING: &str = "pg-13";

/// How many search results to request; the pick is made from the top few.
const SEARCH_LIMIT: &str = "10";
const TRENDING_LIMIT: &str = "5";

/// Giphy API client.
pub struct GiphyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct GifListResponse {
    data: Vec<Gif>,
}

#[derive(Deserialize)]
struct Gif {
    images: Images,
}

#[derive(Deserialize)]
struct Images {
    fixed_height: Option<Image>,
    original: Option<Image>,
}

#[derive(Deserialize)]
struct Image {
    url: String,
}

impl GiphyClient {
    /// Creates a new Giphy client.
    pub fn new(config: &GiphyConfig) -> Result<Self> {
        Self::with_base_url(config, GIPHY_API_BASE)
    }

    /// Creates a client against a non-default API base URL (used in tests).
    pub fn with_base_url(config: &GiphyConfig, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(8))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GiflyError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: config.api_key.clone(),
        })
    }

    /// Searches for a GIF, returning None when nothing matches.
    pub async fn search(&self, query: &str) -> Result<Option<String>> {
        let query = query.trim();
        if query.is_empty() {
            tracing::warn!("Empty GIF search query");
            return Ok(None);
        }

        let url = format!("{}/v1/gifs/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("limit", SEARCH_LIMIT),
                ("rating", RATING),
                ("lang", "en"),
            ])
            .send()
            .await
            .map_err(|e| GiflyError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let results: GifListResponse = response
            .json()
            .await
            .map_err(|e| GiflyError::Transient(format!("Failed to parse Giphy response: {}", e)))?;

        Ok(pick_gif_url(&results.data))
    }

    /// Fetches a random trending GIF as a fallback when search comes up dry.
    pub async fn trending(&self) -> Result<Option<String>> {
        let url = format!("{}/v1/gifs/trending", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("limit", TRENDING_LIMIT),
                ("rating", RATING),
            ])
            .send()
            .await
            .map_err(|e| GiflyError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let results: GifListResponse = response
            .json()
            .await
            .map_err(|e| GiflyError::Transient(format!("Failed to parse Giphy response: {}", e)))?;

        Ok(pick_gif_url(&results.data))
    }
}

/// Randomly picks among the first few results for variety, preferring the
/// fixed-height rendition for consistent sizing.
fn pick_gif_url(gifs: &[Gif]) -> Option<String> {
    if gifs.is_empty() {
        return None;
    }

    let index = rand::thread_rng().gen_range(0..gifs.len().min(3));
    let gif = &gifs[index];

    gif.images
        .fixed_height
        .as_ref()
        .or(gif.images.original.as_ref())
        .map(|image| image.url.clone())
}

/// Maps a non-2xx Giphy response to the error taxonomy.
async fn error_for_status(response: reqwest::Response) -> GiflyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 => GiflyError::Authentication(body),
        _ => GiflyError::Remote {
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: String) -> GiphyClient {
        GiphyClient::with_base_url(
            &GiphyConfig {
                api_key: "test-key".to_string(),
            },
            base_url,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_gif_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gifs/search"))
            .and(query_param("q", "cats"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"images": {"fixed_height": {"url": "https://media.giphy.com/a.gif"}}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let url = client.search("cats").await.unwrap();

        assert_eq!(url.as_deref(), Some("https://media.giphy.com/a.gif"));
    }

    #[tokio::test]
    async fn test_search_falls_back_to_original_rendition() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gifs/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"images": {"original": {"url": "https://media.giphy.com/orig.gif"}}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let url = client.search("cats").await.unwrap();

        assert_eq!(url.as_deref(), Some("https://media.giphy.com/orig.gif"));
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gifs/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        assert!(client.search("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_query_skips_network_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        assert!(client.search("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trending_returns_gif_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gifs/trending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"images": {"fixed_height": {"url": "https://media.giphy.com/t.gif"}}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let url = client.trending().await.unwrap();

        assert_eq!(url.as_deref(), Some("https://media.giphy.com/t.gif"));
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gifs/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let err = client.search("cats").await.unwrap_err();

        assert!(matches!(err, GiflyError::Remote { status: 429, .. }));
    }
}
