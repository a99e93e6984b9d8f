//! Capability traits the pipeline consumes.
//!
//! Which vendor sits behind each trait is an adapter concern (see the
//! `adapters` module); the pipeline only sees these shapes. Tests supply
//! in-memory fakes, which is what keeps every stage unit-testable without
//! HTTP.

use thiserror::Error;

/// Boundary error for any capability call. Carries the vendor error as a
/// message; the pipeline only decides retry/skip/fallback, never inspects
/// vendor specifics.
#[derive(Debug, Error)]
#[error("capability error: {0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One video surfaced by a search query.
#[derive(Debug, Clone)]
pub struct VideoHit {
    pub video_title: String,
    pub video_description: String,
    pub channel_id: String,
    pub channel_title: String,
}

/// One channel surfaced by a channel-type search (fallback path only).
#[derive(Debug, Clone)]
pub struct ChannelHit {
    pub channel_id: String,
    pub channel_title: String,
}

/// Detail + statistics for one channel, as returned by a batch lookup.
/// Counts are `None` when the upstream hides or omits them.
#[derive(Debug, Clone)]
pub struct ChannelDetail {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
}

/// Free-form text generation. May fail, and may return text that is not
/// valid JSON — callers handle both.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError>;
}

/// Search and detail lookups over the channel universe.
#[allow(async_fn_in_trait)]
pub trait ChannelDirectory {
    /// Relevance-ordered video search.
    async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<VideoHit>, CapabilityError>;

    /// Direct channel search; only used by the aggregation fallback.
    async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ChannelHit>, CapabilityError>;

    /// Batch detail lookup for up to 50 channel ids.
    async fn channel_details(
        &self,
        channel_ids: &[String],
    ) -> Result<Vec<ChannelDetail>, CapabilityError>;

    /// Titles of a channel's most recent uploads, newest first.
    async fn recent_video_titles(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<String>, CapabilityError>;
}

/// `None` behaves like [`NoGenerator`], so binaries can hold an optional
/// vendor client and pass it to the pipeline directly.
impl<G: TextGenerator> TextGenerator for Option<G> {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        match self {
            Some(generator) => generator.generate(prompt).await,
            None => Err(CapabilityError::new("no text generator configured")),
        }
    }
}

/// Stand-in generator for deployments without a generation capability.
/// Every call fails, which routes classification to the deterministic
/// fallback and scoring to the keyword-overlap scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGenerator;

impl TextGenerator for NoGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, CapabilityError> {
        Err(CapabilityError::new("no text generator configured"))
    }
}
