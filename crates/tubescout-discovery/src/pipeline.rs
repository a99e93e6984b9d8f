//! The discovery pipeline: classify, synthesize, aggregate, enrich, score.
//!
//! Forward-only stage flow with no retries at this level; each stage owns
//! its own degradation behavior, so only genuinely terminal conditions
//! surface as errors here.

use crate::aggregate::aggregate;
use crate::capabilities::{ChannelDirectory, TextGenerator};
use crate::classify::classify;
use crate::enrich::enrich;
use crate::error::DiscoveryError;
use crate::queries::synthesize_queries;
use crate::score::{rank, rank_with_generator};
use crate::topics::KeywordSet;
use crate::types::{ChannelProfile, DiscoveryLimits, RankedChannel, TopicAnalysis};

/// Everything one discovery run produced: the topic analysis it ran under
/// and the ranked placements.
#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    pub analysis: TopicAnalysis,
    pub placements: Vec<RankedChannel>,
}

/// Runs the full discovery pipeline for one source channel.
///
/// Identical inputs produce identical output order and scores when the
/// generator is deterministic (or absent).
///
/// # Errors
///
/// - [`DiscoveryError::NoCandidatesFound`] when aggregation surfaces zero
///   channels even after the channel-search fallback.
/// - [`DiscoveryError::NoQualityCandidates`] when no candidate survives
///   enrichment with usable detail data.
pub async fn run_discovery<G: TextGenerator, D: ChannelDirectory>(
    generator: &G,
    directory: &D,
    profile: &ChannelProfile,
    limits: &DiscoveryLimits,
) -> Result<DiscoveryOutcome, DiscoveryError> {
    let analysis = classify(generator, profile).await;
    tracing::info!(
        channel = %profile.channel_id,
        topic = %analysis.primary_topic,
        "topic classification complete"
    );

    let queries = synthesize_queries(&analysis, limits.max_queries);
    tracing::info!(count = queries.len(), "synthesized search queries");

    let candidates = aggregate(directory, &queries, &profile.channel_id, limits).await;
    if candidates.is_empty() {
        tracing::info!(channel = %profile.channel_id, "aggregation found no candidates");
        return Err(DiscoveryError::NoCandidatesFound);
    }
    let carried = candidates.into_ordered(limits.carry_limit);
    tracing::info!(count = carried.len(), "carrying candidates into enrichment");

    let enriched = enrich(directory, carried, limits).await?;
    tracing::info!(count = enriched.len(), "candidates passed quality filter");

    let keywords = KeywordSet::from_analysis(&analysis);
    let placements = if limits.llm_scoring {
        rank_with_generator(generator, &analysis, &keywords, enriched).await
    } else {
        rank(&keywords, enriched)
    };
    tracing::info!(count = placements.len(), "ranking complete");

    Ok(DiscoveryOutcome {
        analysis,
        placements,
    })
}
