//! Stage 1: topic classification.
//!
//! The primary path asks the text generator for a JSON analysis that keeps
//! the PRIMARY TOPIC (audience-defining subject) apart from the STYLE
//! (presentation genre). Model output is free text, so the first balanced
//! `{...}` is extracted before parsing. Any call or parse failure degrades
//! to a deterministic heuristic over the profile text — classification
//! never fails the caller.

use thiserror::Error;

use crate::capabilities::TextGenerator;
use crate::topics::{match_topic, MAX_KEYWORDS};
use crate::types::{ChannelProfile, TopicAnalysis};

/// Queries produced by the heuristic fallback at most.
const FALLBACK_QUERIES: usize = 5;
/// Queries kept from a parsed analysis at most.
const MAX_QUERIES: usize = 10;

#[derive(Debug, Error)]
pub enum AnalysisParseError {
    #[error("no JSON object in generator output")]
    NoJsonObject,

    #[error("invalid analysis JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("analysis JSON has no primaryTopic")]
    MissingPrimaryTopic,
}

/// Classifies a channel's primary topic, falling back to the deterministic
/// heuristic on any generator or parse failure.
pub async fn classify<G: TextGenerator>(
    generator: &G,
    profile: &ChannelProfile,
) -> TopicAnalysis {
    let prompt = build_classification_prompt(profile);
    match generator.generate(&prompt).await {
        Ok(raw) => match parse_topic_analysis(&raw) {
            Ok(analysis) => {
                tracing::debug!(
                    channel = %profile.channel_id,
                    topic = %analysis.primary_topic,
                    style = %analysis.style,
                    "classified channel via generator"
                );
                analysis
            }
            Err(e) => {
                tracing::warn!(
                    channel = %profile.channel_id,
                    error = %e,
                    "generator output unparseable — using heuristic classification"
                );
                fallback_analysis(profile)
            }
        },
        Err(e) => {
            tracing::warn!(
                channel = %profile.channel_id,
                error = %e,
                "generator call failed — using heuristic classification"
            );
            fallback_analysis(profile)
        }
    }
}

/// Builds the classification prompt from the profile sample.
fn build_classification_prompt(profile: &ChannelProfile) -> String {
    let titles = profile.video_titles.join("\n- ");
    let descriptions = profile
        .video_descriptions
        .iter()
        .map(|d| truncate_chars(d, 160))
        .collect::<Vec<_>>()
        .join("\n- ");
    let tags = profile.tags.join(", ");

    format!(
        r#"You are analyzing a YouTube channel to find other channels with the SAME AUDIENCE.

Channel name: {name}
Recent video titles:
- {titles}
Recent video descriptions:
- {descriptions}
Tags: {tags}

Distinguish carefully:
- PRIMARY TOPIC: the subject matter that defines who watches (e.g. "Christmas").
- STYLE: the presentation format layered on top (e.g. "rock music", "animation").
A Christmas channel performing rock covers has primary topic "Christmas", NOT "rock".

Search queries must target the PRIMARY TOPIC, never the style.

Return ONLY a single JSON object with this exact shape:
{{
  "primaryTopic": "...",
  "style": "...",
  "niche": "...",
  "audienceInterest": "what this audience wants to watch",
  "language": "two-letter code",
  "primaryTopicKeywords": ["up to 10 lowercase keywords about the primary topic"],
  "searchQueries": ["up to 10 search queries targeting the primary topic"]
}}"#,
        name = profile.name,
    )
}

/// Extracts the first balanced `{...}` substring, tolerating surrounding
/// prose and markdown fences. String literals and escapes are respected so
/// braces inside JSON strings do not unbalance the scan.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses generator output into a normalized [`TopicAnalysis`].
///
/// # Errors
///
/// Returns [`AnalysisParseError`] when no JSON object is present, the JSON
/// does not deserialize, or `primaryTopic` is missing/empty.
pub(crate) fn parse_topic_analysis(raw: &str) -> Result<TopicAnalysis, AnalysisParseError> {
    let json = extract_json_object(raw).ok_or(AnalysisParseError::NoJsonObject)?;
    let analysis: TopicAnalysis = serde_json::from_str(json)?;
    if analysis.primary_topic.trim().is_empty() {
        return Err(AnalysisParseError::MissingPrimaryTopic);
    }
    Ok(normalize_analysis(analysis))
}

/// Enforces the analysis bounds: trimmed fields, deduplicated non-empty
/// queries (≤10), deduplicated keywords (≤10).
fn normalize_analysis(mut analysis: TopicAnalysis) -> TopicAnalysis {
    analysis.primary_topic = analysis.primary_topic.trim().to_owned();
    analysis.style = analysis.style.trim().to_owned();

    analysis.search_queries = dedup_first_seen(
        analysis
            .search_queries
            .iter()
            .map(|q| q.trim().to_owned())
            .filter(|q| !q.is_empty()),
        MAX_QUERIES,
    );
    analysis.primary_topic_keywords = dedup_first_seen(
        analysis
            .primary_topic_keywords
            .iter()
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty()),
        MAX_KEYWORDS,
    );
    analysis
}

/// Deterministic classification from the profile text alone.
///
/// Scans channel name + titles + tags against the ordered topic table;
/// the first pattern with a keyword hit names the primary topic, else
/// "General". Queries come from the first two titles, first two tags, and
/// the channel name; keywords from the pattern hits plus the first three
/// tags.
pub(crate) fn fallback_analysis(profile: &ChannelProfile) -> TopicAnalysis {
    let haystack = format!(
        "{} {} {}",
        profile.name,
        profile.video_titles.join(" "),
        profile.tags.join(" ")
    );
    let haystack_lower = haystack.to_lowercase();
    let pattern = match_topic(&haystack);

    let primary_topic = pattern.map_or("General", |p| p.name).to_owned();

    let mut keywords: Vec<String> = Vec::new();
    if let Some(pattern) = pattern {
        keywords.extend(
            pattern
                .keywords
                .iter()
                .filter(|k| haystack_lower.contains(*k))
                .map(|k| (*k).to_owned()),
        );
    }
    keywords.extend(profile.tags.iter().take(3).cloned());
    let primary_topic_keywords = dedup_first_seen(keywords.into_iter(), MAX_KEYWORDS);

    let queries = profile
        .video_titles
        .iter()
        .take(2)
        .chain(profile.tags.iter().take(2))
        .cloned()
        .chain(std::iter::once(profile.name.clone()))
        .filter(|q| !q.trim().is_empty());
    let search_queries = dedup_first_seen(queries, FALLBACK_QUERIES);

    TopicAnalysis {
        niche: primary_topic.clone(),
        audience_interest: format!("{primary_topic} content"),
        primary_topic,
        style: "video".to_owned(),
        language: "en".to_owned(),
        primary_topic_keywords,
        search_queries,
    }
}

/// First-seen order-preserving dedup (case-sensitive), truncated to `limit`.
pub(crate) fn dedup_first_seen<I: Iterator<Item = String>>(items: I, limit: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
            if seen.len() == limit {
                break;
            }
        }
    }
    seen
}

/// Char-boundary-safe prefix truncation.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
