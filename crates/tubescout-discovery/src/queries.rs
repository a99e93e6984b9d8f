//! Stage 2: query synthesis.

use crate::classify::dedup_first_seen;
use crate::types::TopicAnalysis;

/// Expands a topic analysis into a bounded, deduplicated, priority-ordered
/// query list.
///
/// Priority order: the classifier's own queries first, then directly
/// constructed topic queries, then one `<keyword> channel` query per
/// primary-topic keyword. Search quota is bounded and the aggregator stops
/// early, so the queries most likely to surface on-topic channels must go
/// first. The `>2`-char filter applies to the directly constructed queries
/// only; classifier queries are kept verbatim however short. Dedup is
/// case-sensitive, first-seen wins, and the result is truncated to
/// `max_queries`.
#[must_use]
pub fn synthesize_queries(analysis: &TopicAnalysis, max_queries: usize) -> Vec<String> {
    let topic = analysis.primary_topic.trim();

    let direct = [
        topic.to_owned(),
        format!("{topic} music"),
        format!("{topic} videos"),
        analysis.audience_interest.trim().to_owned(),
    ];

    let candidates = analysis
        .search_queries
        .iter()
        .map(|q| q.trim().to_owned())
        .filter(|q| !q.is_empty())
        .chain(direct.into_iter().filter(|q| q.len() > 2))
        .chain(
            analysis
                .primary_topic_keywords
                .iter()
                .map(|k| format!("{} channel", k.trim())),
        );

    dedup_first_seen(candidates, max_queries)
}
