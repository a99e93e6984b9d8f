//! Wire types for the YouTube Data API v3 plus the flattened records the
//! client hands to callers.
//!
//! The API nests everything under `items[].snippet` and reports statistics
//! counts as decimal strings; the public structs at the bottom flatten both
//! quirks away.

use serde::Deserialize;

/// One video surfaced by a search query.
#[derive(Debug, Clone)]
pub struct VideoResult {
    pub video_title: String,
    pub video_description: String,
    pub channel_id: String,
    pub channel_title: String,
}

/// One channel surfaced by a channel-type search.
#[derive(Debug, Clone)]
pub struct ChannelResult {
    pub channel_id: String,
    pub channel_title: String,
}

/// Snippet + statistics for a single channel from the `channels` endpoint.
///
/// Counts are `None` when the channel hides them (`hiddenSubscriberCount`)
/// or the statistics part is missing entirely.
#[derive(Debug, Clone)]
pub struct ChannelRecord {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
}

// --- search.list ---

#[derive(Debug, Deserialize)]
pub(crate) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    #[serde(default)]
    pub id: SearchItemId,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchItemId {
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
}

// --- channels.list ---

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelItem {
    pub id: String,
    pub snippet: Option<ChannelSnippet>,
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub custom_url: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelStatistics {
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub hidden_subscriber_count: bool,
    pub view_count: Option<String>,
    pub video_count: Option<String>,
}

// --- error envelope ---

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}

impl ChannelItem {
    /// Flattens the nested snippet/statistics shape into a [`ChannelRecord`].
    pub(crate) fn into_record(self) -> ChannelRecord {
        let (title, description, custom_url, thumbnail_url) = match self.snippet {
            Some(s) => {
                let thumb = s.thumbnails.and_then(|t| {
                    t.medium.map(|m| m.url).or_else(|| t.default.map(|d| d.url))
                });
                (s.title, s.description, s.custom_url, thumb)
            }
            None => (String::new(), String::new(), None, None),
        };

        let (subscriber_count, view_count, video_count) = match self.statistics {
            Some(st) => {
                let subs = if st.hidden_subscriber_count {
                    None
                } else {
                    st.subscriber_count.as_deref().and_then(parse_count)
                };
                (
                    subs,
                    st.view_count.as_deref().and_then(parse_count),
                    st.video_count.as_deref().and_then(parse_count),
                )
            }
            None => (None, None, None),
        };

        ChannelRecord {
            channel_id: self.id,
            title,
            description,
            custom_url,
            thumbnail_url,
            subscriber_count,
            view_count,
            video_count,
        }
    }
}

/// The API reports counts as decimal strings; unparseable values become `None`.
fn parse_count(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok()
}
