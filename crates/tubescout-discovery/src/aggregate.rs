//! Stage 3: candidate aggregation.
//!
//! Issues the synthesized queries against video search, deduplicates the
//! responding channels by id in first-seen order, and stops early once
//! enough distinct channels are known. One failing query never aborts the
//! run. Thin niches fall back to direct channel search.

use std::collections::HashMap;

use crate::capabilities::ChannelDirectory;
use crate::classify::truncate_chars;
use crate::types::{CandidateChannel, DiscoveryLimits, FoundVideo};

/// Channel-id-keyed accumulator with explicit first-seen ordering.
///
/// Dedup order is an invariant of the pipeline output, so the order lives
/// in its own `Vec` instead of leaning on map iteration order.
#[derive(Debug, Default)]
pub struct CandidateMap {
    order: Vec<String>,
    records: HashMap<String, CandidateChannel>,
}

impl CandidateMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, channel_id: &str) -> bool {
        self.records.contains_key(channel_id)
    }

    /// Inserts the channel on first sighting; accumulates evidence either way.
    fn record(&mut self, channel_id: &str, channel_name: &str, video: Option<FoundVideo>) {
        let entry = self
            .records
            .entry(channel_id.to_owned())
            .or_insert_with(|| {
                self.order.push(channel_id.to_owned());
                CandidateChannel {
                    channel_id: channel_id.to_owned(),
                    channel_name: channel_name.to_owned(),
                    found_videos: Vec::new(),
                }
            });
        if let Some(video) = video {
            entry.found_videos.push(video);
        }
    }

    /// Consumes the map into candidates in first-seen order, truncated to
    /// `limit`.
    #[must_use]
    pub fn into_ordered(mut self, limit: usize) -> Vec<CandidateChannel> {
        self.order
            .into_iter()
            .take(limit)
            .filter_map(|id| self.records.remove(&id))
            .collect()
    }
}

/// Termination predicate for the query loop, evaluated after each query's
/// results are merged.
#[must_use]
pub fn enough_candidates(distinct_channels: usize, limits: &DiscoveryLimits) -> bool {
    distinct_channels >= limits.early_stop_channels
}

/// Runs the aggregation pass: video search per query with early stop, then
/// the channel-search fallback when too few distinct channels surfaced.
///
/// The source channel is excluded everywhere. Individual query failures
/// are logged and skipped.
pub async fn aggregate<D: ChannelDirectory>(
    directory: &D,
    queries: &[String],
    source_channel_id: &str,
    limits: &DiscoveryLimits,
) -> CandidateMap {
    let mut candidates = CandidateMap::new();

    for query in queries {
        match directory
            .search_videos(query, limits.video_search_results)
            .await
        {
            Ok(hits) => {
                for hit in hits {
                    if hit.channel_id == source_channel_id {
                        continue;
                    }
                    let video = FoundVideo {
                        title: hit.video_title,
                        description: truncate_chars(&hit.video_description, limits.snippet_chars),
                    };
                    candidates.record(&hit.channel_id, &hit.channel_title, Some(video));
                }
                tracing::debug!(
                    query = %query,
                    distinct = candidates.len(),
                    "merged video search results"
                );
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "video search failed — skipping query");
            }
        }

        if enough_candidates(candidates.len(), limits) {
            tracing::debug!(
                distinct = candidates.len(),
                "early stop — enough candidates collected"
            );
            break;
        }
    }

    if candidates.len() < limits.fallback_threshold {
        tracing::info!(
            distinct = candidates.len(),
            threshold = limits.fallback_threshold,
            "too few candidates from video search — running channel search fallback"
        );
        channel_search_fallback(directory, queries, source_channel_id, limits, &mut candidates)
            .await;
    }

    candidates
}

/// Re-runs the first `fallback_queries` queries against direct channel
/// search, inserting new non-self channels with empty evidence.
async fn channel_search_fallback<D: ChannelDirectory>(
    directory: &D,
    queries: &[String],
    source_channel_id: &str,
    limits: &DiscoveryLimits,
    candidates: &mut CandidateMap,
) {
    for query in queries.iter().take(limits.fallback_queries) {
        match directory
            .search_channels(query, limits.channel_search_results)
            .await
        {
            Ok(hits) => {
                for hit in hits {
                    if hit.channel_id == source_channel_id {
                        continue;
                    }
                    candidates.record(&hit.channel_id, &hit.channel_title, None);
                }
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "channel search failed — skipping query");
            }
        }
    }
}
