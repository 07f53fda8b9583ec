//! Pixabay REST API image source.
//!
//! Issues one `GET` per query against the search endpoint and maps the JSON
//! response onto [`ResultPage`]. The API key is part of the query string, so
//! URLs are stripped from transport errors and never logged.

use super::backend::ImageSource;
use super::models::SearchResponse;
use crate::domain::{FeedError, FetchFailure, QueryParameters, ResultPage, Result};
use crate::Config;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Public search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pixabay.com/api/";

/// HTTP client for the Pixabay search API.
#[derive(Clone)]
pub struct PixabaySource {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for PixabaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixabaySource")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl PixabaySource {
    /// Creates a source for `base_url` whose requests give up after
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, base_url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Creates a source from the `api_key`, `base_url` and
    /// `request_timeout_secs` settings.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the API key is empty or the base URL
    /// does not parse.
    ///
    /// # Example
    ///
    /// ```
    /// use pixfeed::source::PixabaySource;
    /// use pixfeed::Config;
    ///
    /// let config = Config {
    ///     api_key: "abc123".into(),
    ///     ..Default::default()
    /// };
    /// let source = PixabaySource::from_config(&config)?;
    /// assert!(!format!("{source:?}").contains("abc123"));
    /// # Ok::<(), pixfeed::FeedError>(())
    /// ```
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(FeedError::Config(
                "api_key is empty; set it in the config file or PIXFEED_API_KEY".to_string(),
            ));
        }
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FeedError::Config(format!("invalid base_url {:?}: {e}", config.base_url)))?;

        Self::new(
            config.api_key.clone(),
            base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Full request URL for `params`, including the API key.
    #[must_use]
    pub fn request_url(&self, params: &QueryParameters) -> Url {
        params.to_url(&self.base_url, &self.api_key)
    }
}

#[async_trait]
impl ImageSource for PixabaySource {
    async fn fetch(&self, params: &QueryParameters) -> std::result::Result<ResultPage, FetchFailure> {
        tracing::debug!(
            page = params.page,
            search_term = ?params.search_term,
            category = ?params.category,
            facets = params.facets.len(),
            "requesting page"
        );

        let response = self
            .client
            .get(self.request_url(params))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Transport(format!("HTTP {status}")));
        }

        let body = response.bytes().await.map_err(transport)?;
        let page = parse_response(&body)?;

        tracing::debug!(
            page = params.page,
            items = page.len(),
            total_hits = page.total_hits,
            "page received"
        );
        Ok(page)
    }
}

fn transport(error: reqwest::Error) -> FetchFailure {
    FetchFailure::Transport(error.without_url().to_string())
}

/// Parses a search response body.
///
/// # Errors
///
/// Returns [`FetchFailure::MalformedResponse`] if the body is not JSON or has
/// no `hits` array.
///
/// # Example
///
/// ```
/// use pixfeed::source::pixabay::parse_response;
///
/// let page = parse_response(br#"{"total":1,"totalHits":1,"hits":[{"id":5,"tags":"sea, sky"}]}"#)?;
/// assert_eq!(page.items[0].tags, vec!["sea", "sky"]);
/// # Ok::<(), pixfeed::FetchFailure>(())
/// ```
pub fn parse_response(body: &[u8]) -> std::result::Result<ResultPage, FetchFailure> {
    let response: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| FetchFailure::MalformedResponse(e.to_string()))?;

    response
        .into_page()
        .ok_or_else(|| FetchFailure::MalformedResponse("response has no hits".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "total": 4692,
        "totalHits": 500,
        "hits": [
            {
                "id": 195893,
                "pageURL": "https://pixabay.com/en/blossom-bloom-flower-195893/",
                "type": "photo",
                "tags": "blossom, bloom, flower",
                "previewURL": "https://cdn.pixabay.com/photo/2013/10/15/09/12/flower-195893_150.jpg",
                "previewWidth": 150,
                "previewHeight": 84,
                "webformatURL": "https://pixabay.com/get/35bbf209e13e39d2_640.jpg",
                "webformatWidth": 640,
                "webformatHeight": 360,
                "largeImageURL": "https://pixabay.com/get/ed6a99fd0a76647_1280.jpg",
                "imageWidth": 4000,
                "imageHeight": 2250,
                "imageSize": 4731420,
                "views": 7671,
                "downloads": 6439,
                "likes": 5,
                "comments": 2,
                "user_id": 48777,
                "user": "Josch13",
                "userImageURL": "https://cdn.pixabay.com/user/2013/11/05/02-10-23-764_250x250.jpg"
            }
        ]
    }"#;

    #[test]
    fn parses_sample_response() {
        let page = parse_response(SAMPLE.as_bytes()).unwrap();

        assert_eq!(page.total_hits, 500);
        let item = &page.items[0];
        assert_eq!(item.id, 195_893);
        assert_eq!((item.width, item.height), (4000, 2250));
        assert_eq!(item.tags, vec!["blossom", "bloom", "flower"]);
        assert_eq!(item.user.as_deref(), Some("Josch13"));
        assert_eq!(item.file_name(), Some("flower-195893_150.jpg"));
    }

    #[test]
    fn empty_hits_is_an_empty_page() {
        let page = parse_response(br#"{"total":0,"totalHits":0,"hits":[]}"#).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn missing_hits_is_malformed() {
        let err = parse_response(br#"{"total":0,"totalHits":0}"#).unwrap_err();
        assert!(matches!(err, FetchFailure::MalformedResponse(_)));
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_response(b"[ERROR 400] \"page\" is out of valid range.").unwrap_err();
        assert!(matches!(err, FetchFailure::MalformedResponse(_)));
    }

    #[test]
    fn config_without_key_is_rejected() {
        let err = PixabaySource::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn request_url_carries_key_and_params() {
        let source = PixabaySource::new(
            "k3y",
            Url::parse(DEFAULT_BASE_URL).unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        let params = QueryParameters {
            page: 2,
            search_term: Some("cat".into()),
            ..Default::default()
        };

        assert_eq!(
            source.request_url(&params).as_str(),
            "https://pixabay.com/api/?key=k3y&per_page=26&safesearch=true&editors_choice=true&page=2&q=cat"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_failure() {
        let source = PixabaySource::new(
            "secret-key",
            Url::parse("http://127.0.0.1:9/api/").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = source.fetch(&QueryParameters::default()).await.unwrap_err();
        match err {
            FetchFailure::Transport(message) => assert!(!message.contains("secret-key")),
            other => panic!("expected transport failure, got {other:?}"),
        }
    }
}
