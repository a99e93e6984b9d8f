//! Stage 4: relevance scoring and ranking.
//!
//! The keyword-overlap scorer is the deterministic baseline; a text
//! generator can overlay judged scores on top. Either way the final order
//! is fully deterministic: score descending, subscriber count descending,
//! channel id ascending.

use serde::Deserialize;

use crate::capabilities::TextGenerator;
use crate::classify::extract_json_object;
use crate::topics::KeywordSet;
use crate::types::{EnrichedChannel, RankedChannel, TopicAnalysis};

/// Keyword-overlap relevance in `[0, 100]`: the fraction of keyword-set
/// terms occurring anywhere in the channel's title, description, or recent
/// upload titles.
#[must_use]
pub fn keyword_score(keywords: &KeywordSet, channel: &EnrichedChannel) -> f32 {
    if keywords.is_empty() {
        return 0.0;
    }
    let haystack = format!(
        "{} {} {}",
        channel.title,
        channel.description,
        channel.recent_titles.join(" ")
    );
    #[allow(clippy::cast_precision_loss)]
    let fraction = keywords.count_matches(&haystack) as f32 / keywords.len() as f32;
    fraction * 100.0
}

/// Ranks channels by the deterministic keyword scorer.
#[must_use]
pub fn rank(keywords: &KeywordSet, channels: Vec<EnrichedChannel>) -> Vec<RankedChannel> {
    let ranked = channels
        .into_iter()
        .map(|channel| {
            let score = keyword_score(keywords, &channel);
            into_ranked(channel, score, None)
        })
        .collect();
    sort_ranked(ranked)
}

/// Ranks channels with generator-judged scores where available.
///
/// The generator is asked once for the whole batch. A failed call, an
/// unparseable reply, or a channel missing from the reply all fall back to
/// the keyword score for the affected channels; judged scores are clamped
/// to `[0, 100]`. Ties break identically to [`rank`].
pub async fn rank_with_generator<G: TextGenerator>(
    generator: &G,
    analysis: &TopicAnalysis,
    keywords: &KeywordSet,
    channels: Vec<EnrichedChannel>,
) -> Vec<RankedChannel> {
    let prompt = build_scoring_prompt(analysis, keywords, &channels);
    let judged = match generator.generate(&prompt).await {
        Ok(raw) => match parse_scores(&raw) {
            Some(scores) => scores,
            None => {
                tracing::warn!("unparseable scoring reply — using keyword scores");
                return rank(keywords, channels);
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "scoring generation failed — using keyword scores");
            return rank(keywords, channels);
        }
    };

    let ranked = channels
        .into_iter()
        .map(|channel| {
            let entry = judged.iter().find(|s| s.channel_id == channel.channel_id);
            match entry {
                Some(entry) => {
                    let score = entry.score.clamp(0.0, 100.0);
                    into_ranked(channel, score, entry.reason.clone())
                }
                None => {
                    let score = keyword_score(keywords, &channel);
                    into_ranked(channel, score, None)
                }
            }
        })
        .collect();
    sort_ranked(ranked)
}

fn into_ranked(
    channel: EnrichedChannel,
    score: f32,
    justification: Option<String>,
) -> RankedChannel {
    RankedChannel {
        channel_id: channel.channel_id,
        channel_name: channel.title,
        custom_url: channel.custom_url,
        thumbnail_url: channel.thumbnail_url,
        subscriber_count: channel.subscriber_count,
        score,
        justification,
        evidence: channel.found_videos,
    }
}

/// Deterministic order: score desc, then subscribers desc, then id asc.
fn sort_ranked(mut ranked: Vec<RankedChannel>) -> Vec<RankedChannel> {
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.subscriber_count.cmp(&a.subscriber_count))
            .then_with(|| a.channel_id.cmp(&b.channel_id))
    });
    ranked
}

fn build_scoring_prompt(
    analysis: &TopicAnalysis,
    keywords: &KeywordSet,
    channels: &[EnrichedChannel],
) -> String {
    let mut prompt = format!(
        r#"You score YouTube channels for audience overlap with a creator.

The creator's PRIMARY TOPIC is "{topic}" (audience interest: "{interest}").
Their presentation style is "{style}" — style alone is NOT audience overlap.
A channel that matches only the style but not the primary topic must score low.
Topic keywords: {keywords}.

Score each channel 0-100 for how likely its audience is to care about the
primary topic. Reply with ONLY this JSON, no prose:
{{"scores": [{{"channelId": "...", "score": 0, "reason": "..."}}]}}

Channels:
"#,
        topic = analysis.primary_topic,
        interest = analysis.audience_interest,
        style = analysis.style,
        keywords = keywords.terms().join(", "),
    );
    for channel in channels {
        prompt.push_str(&format!(
            "- id: {} | title: {} | about: {} | recent uploads: {}\n",
            channel.channel_id,
            channel.title,
            channel.description,
            channel.recent_titles.join("; "),
        ));
    }
    prompt
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoredEntry {
    channel_id: String,
    score: f32,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScoresReply {
    scores: Vec<ScoredEntry>,
}

fn parse_scores(raw: &str) -> Option<Vec<ScoredEntry>> {
    let json = extract_json_object(raw)?;
    serde_json::from_str::<ScoresReply>(json)
        .ok()
        .map(|reply| reply.scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilityError;

    fn channel(id: &str, title: &str, subs: u64) -> EnrichedChannel {
        EnrichedChannel {
            channel_id: id.to_owned(),
            title: title.to_owned(),
            description: String::new(),
            custom_url: None,
            thumbnail_url: None,
            subscriber_count: subs,
            view_count: None,
            video_count: None,
            recent_titles: Vec::new(),
            found_videos: Vec::new(),
        }
    }

    fn christmas_keywords() -> KeywordSet {
        KeywordSet::from_analysis(&TopicAnalysis {
            primary_topic: "Christmas".to_owned(),
            ..TopicAnalysis::default()
        })
    }

    struct CannedGenerator(String);

    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, CapabilityError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, CapabilityError> {
            Err(CapabilityError::new("generation unavailable"))
        }
    }

    #[test]
    fn keyword_score_rewards_topic_overlap() {
        let keywords = christmas_keywords();
        let on_topic = channel("UCa", "Christmas Carols with Santa", 1);
        let off_topic = channel("UCb", "Pure Rock Covers", 1);
        assert!(keyword_score(&keywords, &on_topic) > 0.0);
        assert!((keyword_score(&keywords, &off_topic) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn keyword_score_reads_recent_titles() {
        let keywords = christmas_keywords();
        let mut c = channel("UCa", "Weekly Uploads", 1);
        assert!((keyword_score(&keywords, &c) - 0.0).abs() < f32::EPSILON);
        c.recent_titles.push("Xmas special".to_owned());
        assert!(keyword_score(&keywords, &c) > 0.0);
    }

    #[test]
    fn rank_orders_score_then_subscribers_then_id() {
        let keywords = christmas_keywords();
        let ranked = rank(
            &keywords,
            vec![
                channel("UCz", "Plain Vlogs", 9_000),
                channel("UCb", "Christmas Hits", 100),
                channel("UCa", "Plain Vlogs", 9_000),
                channel("UCc", "Plain Vlogs", 10_000),
            ],
        );
        let ids: Vec<&str> = ranked.iter().map(|r| r.channel_id.as_str()).collect();
        assert_eq!(ids, ["UCb", "UCc", "UCa", "UCz"]);
    }

    #[test]
    fn rank_is_idempotent_on_equal_input() {
        let keywords = christmas_keywords();
        let input = vec![
            channel("UCa", "Christmas Hits", 5),
            channel("UCb", "Santa Stories", 5),
            channel("UCc", "Vlogs", 5),
        ];
        let first = rank(&keywords, input.clone());
        let second = rank(&keywords, input);
        let order = |r: &[RankedChannel]| {
            r.iter()
                .map(|c| (c.channel_id.clone(), c.score.to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(order(&first), order(&second));
    }

    #[tokio::test]
    async fn generator_scores_and_reasons_are_applied() {
        let generator = CannedGenerator(
            r#"Sure! {"scores": [
                {"channelId": "UCa", "score": 92.0, "reason": "holiday catalog"},
                {"channelId": "UCb", "score": 10.0, "reason": "style only"}
            ]}"#
            .to_owned(),
        );
        let analysis = TopicAnalysis {
            primary_topic: "Christmas".to_owned(),
            ..TopicAnalysis::default()
        };
        let ranked = rank_with_generator(
            &generator,
            &analysis,
            &christmas_keywords(),
            vec![
                channel("UCb", "Rock Covers", 1),
                channel("UCa", "Holiday Music", 1),
            ],
        )
        .await;
        assert_eq!(ranked[0].channel_id, "UCa");
        assert!((ranked[0].score - 92.0).abs() < f32::EPSILON);
        assert_eq!(ranked[0].justification.as_deref(), Some("holiday catalog"));
    }

    #[tokio::test]
    async fn judged_scores_are_clamped() {
        let generator = CannedGenerator(
            r#"{"scores": [{"channelId": "UCa", "score": 250.0}, {"channelId": "UCb", "score": -10.0}]}"#
                .to_owned(),
        );
        let ranked = rank_with_generator(
            &generator,
            &TopicAnalysis::default(),
            &christmas_keywords(),
            vec![channel("UCa", "A", 1), channel("UCb", "B", 1)],
        )
        .await;
        assert!((ranked[0].score - 100.0).abs() < f32::EPSILON);
        assert!((ranked[1].score - 0.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn missing_channel_keeps_keyword_score() {
        let generator =
            CannedGenerator(r#"{"scores": [{"channelId": "UCa", "score": 50.0}]}"#.to_owned());
        let keywords = christmas_keywords();
        let ranked = rank_with_generator(
            &generator,
            &TopicAnalysis::default(),
            &keywords,
            vec![
                channel("UCa", "A", 1),
                channel("UCb", "Christmas Carols Santa Xmas", 1),
            ],
        )
        .await;
        let b = ranked.iter().find(|r| r.channel_id == "UCb").unwrap();
        assert!(b.score > 0.0, "unjudged channel falls back to keyword score");
        assert!(b.justification.is_none());
    }

    #[tokio::test]
    async fn generation_failure_falls_back_to_keyword_ranking() {
        let keywords = christmas_keywords();
        let channels = vec![
            channel("UCa", "Christmas Hits", 1),
            channel("UCb", "Rock Covers", 1),
        ];
        let judged = rank_with_generator(
            &FailingGenerator,
            &TopicAnalysis::default(),
            &keywords,
            channels.clone(),
        )
        .await;
        let deterministic = rank(&keywords, channels);
        assert_eq!(
            judged.iter().map(|r| &r.channel_id).collect::<Vec<_>>(),
            deterministic.iter().map(|r| &r.channel_id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn unparseable_reply_falls_back_to_keyword_ranking() {
        let generator = CannedGenerator("I cannot produce JSON today.".to_owned());
        let ranked = rank_with_generator(
            &generator,
            &TopicAnalysis::default(),
            &christmas_keywords(),
            vec![channel("UCa", "Christmas Hits", 1)],
        )
        .await;
        assert!(ranked[0].score > 0.0);
        assert!(ranked[0].justification.is_none());
    }
}
