//! Stage 3b: candidate enrichment.
//!
//! Batch-fetches detail and statistics for carried candidates, drops the
//! ones without usable detail data, and samples each survivor's recent
//! upload titles for the scorer.

use futures::future::join_all;

use crate::capabilities::{ChannelDetail, ChannelDirectory};
use crate::error::DiscoveryError;
use crate::types::{CandidateChannel, DiscoveryLimits, EnrichedChannel};

/// Enriches candidates into scoreable channels.
///
/// Quality filter: a candidate survives only with a non-empty title and a
/// visible subscriber count. Survivors are capped at `score_limit` in
/// candidate order. Recent-title fetches run concurrently; a failed fetch
/// leaves that channel's sample empty rather than dropping it.
///
/// # Errors
///
/// Returns [`DiscoveryError::NoQualityCandidates`] when the batch detail
/// lookup fails outright or when no candidate passes the quality filter.
pub async fn enrich<D: ChannelDirectory>(
    directory: &D,
    candidates: Vec<CandidateChannel>,
    limits: &DiscoveryLimits,
) -> Result<Vec<EnrichedChannel>, DiscoveryError> {
    let ids: Vec<String> = candidates.iter().map(|c| c.channel_id.clone()).collect();
    let details = match directory.channel_details(&ids).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(error = %e, "channel detail lookup failed");
            return Err(DiscoveryError::NoQualityCandidates);
        }
    };

    let mut enriched: Vec<EnrichedChannel> = Vec::new();
    for candidate in candidates {
        if enriched.len() >= limits.score_limit {
            break;
        }
        let Some(detail) = details.iter().find(|d| d.channel_id == candidate.channel_id) else {
            continue;
        };
        match quality_check(detail) {
            Some(subscriber_count) => enriched.push(EnrichedChannel {
                channel_id: detail.channel_id.clone(),
                title: detail.title.clone(),
                description: detail.description.clone(),
                custom_url: detail.custom_url.clone(),
                thumbnail_url: detail.thumbnail_url.clone(),
                subscriber_count,
                view_count: detail.view_count,
                video_count: detail.video_count,
                recent_titles: Vec::new(),
                found_videos: candidate.found_videos,
            }),
            None => {
                tracing::debug!(channel_id = %candidate.channel_id, "dropped by quality filter");
            }
        }
    }

    if enriched.is_empty() {
        return Err(DiscoveryError::NoQualityCandidates);
    }

    let title_fetches = enriched.iter().map(|channel| {
        directory.recent_video_titles(&channel.channel_id, limits.recent_titles)
    });
    // join_all preserves input order, so results line up with `enriched`.
    let title_results = join_all(title_fetches).await;
    for (channel, result) in enriched.iter_mut().zip(title_results) {
        match result {
            Ok(titles) => channel.recent_titles = titles,
            Err(e) => {
                tracing::warn!(
                    channel_id = %channel.channel_id,
                    error = %e,
                    "recent uploads fetch failed — scoring without title sample"
                );
            }
        }
    }

    Ok(enriched)
}

/// Returns the visible subscriber count when the detail record is usable.
fn quality_check(detail: &ChannelDetail) -> Option<u64> {
    if detail.title.trim().is_empty() {
        return None;
    }
    detail.subscriber_count
}
