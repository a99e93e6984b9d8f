//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and quota-aware error handling. Non-2xx responses are decoded from the
//! standard Google error envelope so quota exhaustion (`quotaExceeded`,
//! `dailyLimitExceeded`, `rateLimitExceeded`) can be told apart from
//! ordinary request errors.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::YouTubeError;
use crate::retry::retry_with_backoff;
use crate::types::{
    ChannelListResponse, ChannelRecord, ChannelResult, ErrorEnvelope, SearchListResponse,
    VideoResult,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Error reasons Google uses for exhausted quota or rate limits.
const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];

/// Client for the YouTube Data API v3.
///
/// Manages the HTTP client, API key, and base URL. Use [`YouTubeClient::new`]
/// for production or [`YouTubeClient::with_base_url`] to point at a mock
/// server in tests.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YouTubeClient {
    /// Creates a new client pointed at the production YouTube API.
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, YouTubeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YouTubeError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YouTubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: the base URL must end with a slash so Url::join appends
        // the resource path instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YouTubeError::Api {
            status: 0,
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 2,
            backoff_base_ms: 500,
        })
    }

    /// Overrides the retry policy (defaults: 2 retries, 500 ms base back-off).
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Searches videos by keyword, ordered by relevance.
    ///
    /// Items without an owning channel in the snippet are skipped.
    ///
    /// # Errors
    ///
    /// - [`YouTubeError::QuotaExceeded`] if the daily quota is exhausted.
    /// - [`YouTubeError::Api`] on other API-level errors.
    /// - [`YouTubeError::Http`] on network failure.
    /// - [`YouTubeError::Deserialize`] if the response shape is unexpected.
    pub async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<VideoResult>, YouTubeError> {
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("order", "relevance"),
                ("maxResults", &max_results.to_string()),
            ],
        );
        let body = self.request_json(&url).await?;

        let response: SearchListResponse =
            serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                context: format!("search(q={query}, type=video)"),
                source: e,
            })?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet?;
                if snippet.channel_id.is_empty() {
                    return None;
                }
                Some(VideoResult {
                    video_title: snippet.title,
                    video_description: snippet.description,
                    channel_id: snippet.channel_id,
                    channel_title: snippet.channel_title,
                })
            })
            .collect())
    }

    /// Searches channels by keyword (the aggregation fallback path).
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`YouTubeClient::search_videos`].
    pub async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ChannelResult>, YouTubeError> {
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "channel"),
                ("maxResults", &max_results.to_string()),
            ],
        );
        let body = self.request_json(&url).await?;

        let response: SearchListResponse =
            serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                context: format!("search(q={query}, type=channel)"),
                source: e,
            })?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let channel_id = item
                    .id
                    .channel_id
                    .or_else(|| item.snippet.as_ref().map(|s| s.channel_id.clone()))
                    .filter(|id| !id.is_empty())?;
                let channel_title = item.snippet.map(|s| s.channel_title).unwrap_or_default();
                Some(ChannelResult {
                    channel_id,
                    channel_title,
                })
            })
            .collect())
    }

    /// Fetches snippet + statistics for up to 50 channels in one batch call.
    ///
    /// Returns an empty list without issuing a request when `ids` is empty.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`YouTubeClient::search_videos`].
    pub async fn channel_details(
        &self,
        ids: &[String],
    ) -> Result<Vec<ChannelRecord>, YouTubeError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.build_url(
            "channels",
            &[("part", "snippet,statistics"), ("id", &ids.join(","))],
        );
        let body = self.request_json(&url).await?;

        let response: ChannelListResponse =
            serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                context: format!("channels(id count={})", ids.len()),
                source: e,
            })?;

        Ok(response
            .items
            .into_iter()
            .map(super::types::ChannelItem::into_record)
            .collect())
    }

    /// Fetches a channel's most recent uploads, newest first.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`YouTubeClient::search_videos`].
    pub async fn recent_videos(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<VideoResult>, YouTubeError> {
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", &max_results.to_string()),
            ],
        );
        let body = self.request_json(&url).await?;

        let response: SearchListResponse =
            serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                context: format!("search(channelId={channel_id}, order=date)"),
                source: e,
            })?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet?;
                Some(VideoResult {
                    video_title: snippet.title,
                    video_description: snippet.description,
                    channel_id: snippet.channel_id,
                    channel_title: snippet.channel_title,
                })
            })
            .collect())
    }

    /// Builds the full request URL with properly percent-encoded query parameters.
    fn build_url(&self, resource: &str, extra: &[(&str, &str)]) -> Url {
        // base_url is guaranteed to end in '/' by the constructor, so join
        // cannot fail for a bare resource name.
        let mut url = self
            .base_url
            .join(resource)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request under the retry policy and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::QuotaExceeded`] / [`YouTubeError::Api`] when
    /// the API reports an error, [`YouTubeError::Http`] on network failure,
    /// and [`YouTubeError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, YouTubeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json_once(url.clone())
        })
        .await
    }

    async fn request_json_once(&self, url: Url) -> Result<serde_json::Value, YouTubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::decode_api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| YouTubeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Maps a non-2xx response body to the error taxonomy.
    fn decode_api_error(status: u16, body: &str) -> YouTubeError {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let quota = envelope
                    .error
                    .errors
                    .iter()
                    .find(|d| QUOTA_REASONS.contains(&d.reason.as_str()));
                if let Some(detail) = quota {
                    return YouTubeError::QuotaExceeded(detail.reason.clone());
                }
                YouTubeError::Api {
                    status: if envelope.error.code > 0 {
                        envelope.error.code
                    } else {
                        status
                    },
                    message: envelope.error.message,
                }
            }
            Err(_) => YouTubeError::Api {
                status,
                message: format!(
                    "unexpected response body: {}",
                    body.chars().take(200).collect::<String>()
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> YouTubeClient {
        YouTubeClient::with_base_url("test-key", 30, "tubescout-test/0.1", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://www.googleapis.com/youtube/v3");
        let url = client.build_url("search", &[("part", "snippet"), ("q", "christmas")]);
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/youtube/v3/search?part=snippet&q=christmas&key=test-key"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://www.googleapis.com/youtube/v3");
        let url = client.build_url("search", &[("q", "santa & elves")]);
        assert!(
            url.as_str().contains("santa+%26+elves") || url.as_str().contains("santa%20%26%20elves"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn decode_api_error_detects_quota_reason() {
        let body = r#"{"error":{"code":403,"message":"quota","errors":[{"reason":"quotaExceeded"}]}}"#;
        let err = YouTubeClient::decode_api_error(403, body);
        assert!(matches!(err, YouTubeError::QuotaExceeded(ref r) if r == "quotaExceeded"));
    }

    #[test]
    fn decode_api_error_falls_back_to_api_variant() {
        let body = r#"{"error":{"code":400,"message":"bad request","errors":[{"reason":"invalidParameter"}]}}"#;
        let err = YouTubeClient::decode_api_error(400, body);
        assert!(
            matches!(err, YouTubeError::Api { status: 400, ref message } if message == "bad request")
        );
    }

    #[test]
    fn decode_api_error_tolerates_non_json_body() {
        let err = YouTubeClient::decode_api_error(502, "Bad Gateway");
        assert!(matches!(err, YouTubeError::Api { status: 502, .. }));
    }
}
