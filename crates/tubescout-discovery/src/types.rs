use serde::{Deserialize, Serialize};

/// How many recent videos of the source channel feed classification.
pub const PROFILE_SAMPLE: usize = 8;

/// The source channel being analyzed. Immutable input, one per request.
#[derive(Debug, Clone)]
pub struct ChannelProfile {
    pub channel_id: String,
    pub name: String,
    /// Titles of the channel's most recent uploads (bounded sample).
    pub video_titles: Vec<String>,
    /// Descriptions matching `video_titles` (may be shorter).
    pub video_descriptions: Vec<String>,
    pub tags: Vec<String>,
}

impl ChannelProfile {
    /// Builds a profile, truncating the video sample to [`PROFILE_SAMPLE`].
    #[must_use]
    pub fn sampled(
        channel_id: impl Into<String>,
        name: impl Into<String>,
        mut video_titles: Vec<String>,
        mut video_descriptions: Vec<String>,
        tags: Vec<String>,
    ) -> Self {
        video_titles.truncate(PROFILE_SAMPLE);
        video_descriptions.truncate(PROFILE_SAMPLE);
        Self {
            channel_id: channel_id.into(),
            name: name.into(),
            video_titles,
            video_descriptions,
            tags,
        }
    }
}

/// Classifier output. Created once per request and never mutated.
///
/// `primary_topic` is the audience-defining subject ("Christmas");
/// `style` is the presentation genre layered on top ("rock music"). The
/// query and scoring stages key exclusively off the primary topic and its
/// keywords — style must never leak into either.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicAnalysis {
    pub primary_topic: String,
    pub style: String,
    pub niche: String,
    pub audience_interest: String,
    pub language: String,
    /// Ordered, deduplicated; at most 10 entries.
    pub primary_topic_keywords: Vec<String>,
    /// Ordered, deduplicated, no empty strings; at most 10 entries.
    pub search_queries: Vec<String>,
}

/// A search-matched video snippet: the evidence for why a candidate
/// channel was surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundVideo {
    pub title: String,
    /// Truncated to the configured snippet length.
    pub description: String,
}

/// A channel discovered during aggregation, not yet known to be relevant.
///
/// Keyed by `channel_id`; evidence accumulates across queries. Never the
/// source channel itself.
#[derive(Debug, Clone)]
pub struct CandidateChannel {
    pub channel_id: String,
    pub channel_name: String,
    pub found_videos: Vec<FoundVideo>,
}

/// A candidate that passed the quality filter during enrichment: detail
/// fields are present and the subscriber count is visible.
#[derive(Debug, Clone)]
pub struct EnrichedChannel {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub subscriber_count: u64,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
    /// Bounded sample of the channel's recent upload titles.
    pub recent_titles: Vec<String>,
    pub found_videos: Vec<FoundVideo>,
}

/// A scored candidate ready for presentation, in deterministic rank order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedChannel {
    pub channel_id: String,
    pub channel_name: String,
    pub custom_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub subscriber_count: u64,
    /// Relevance in `[0, 100]`.
    pub score: f32,
    /// Present when the generation-based scorer supplied one.
    pub justification: Option<String>,
    pub evidence: Vec<FoundVideo>,
}

/// Tunable bounds for one discovery run.
///
/// The defaults are the product's shipped heuristics; tests shrink them to
/// exercise the early-stop and fallback paths cheaply.
#[derive(Debug, Clone)]
pub struct DiscoveryLimits {
    /// Queries issued at most, after synthesis dedup.
    pub max_queries: usize,
    /// Results requested per video-search call.
    pub video_search_results: u32,
    /// Stop issuing queries once this many distinct channels are known.
    pub early_stop_channels: usize,
    /// Run the channel-search fallback below this many distinct channels.
    pub fallback_threshold: usize,
    /// Queries re-run against channel search in the fallback pass.
    pub fallback_queries: usize,
    /// Results requested per channel-search call.
    pub channel_search_results: u32,
    /// Candidates carried into enrichment at most.
    pub carry_limit: usize,
    /// Enriched candidates scored at most.
    pub score_limit: usize,
    /// Evidence descriptions are truncated to this many characters.
    pub snippet_chars: usize,
    /// Recent titles fetched per candidate before scoring.
    pub recent_titles: u32,
    /// Use the text generator for scoring; the deterministic keyword
    /// scorer is always the fallback.
    pub llm_scoring: bool,
}

impl Default for DiscoveryLimits {
    fn default() -> Self {
        Self {
            max_queries: 10,
            video_search_results: 25,
            early_stop_channels: 40,
            fallback_threshold: 5,
            fallback_queries: 4,
            channel_search_results: 15,
            carry_limit: 50,
            score_limit: 25,
            snippet_chars: 200,
            recent_titles: 5,
            llm_scoring: true,
        }
    }
}
