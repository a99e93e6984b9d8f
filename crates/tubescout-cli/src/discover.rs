//! `tubescout discover` — run the full placement discovery pipeline.

use std::time::Duration;

use tokio::time::timeout;

use tubescout_core::AppConfig;
use tubescout_discovery::{run_discovery, DiscoveryError, DiscoveryLimits};

use crate::{build_gemini, build_youtube, resolve_profile, DiscoverArgs};

pub(crate) async fn run(config: &AppConfig, args: &DiscoverArgs) -> anyhow::Result<()> {
    let youtube = build_youtube(config)?;
    let gemini = build_gemini(config)?;

    let profile = resolve_profile(&youtube, &args.profile).await?;
    let limits = DiscoveryLimits {
        llm_scoring: gemini.is_some() && !args.no_llm_score,
        ..DiscoveryLimits::default()
    };

    let deadline = Duration::from_secs(config.request_deadline_secs);
    let outcome = match timeout(deadline, run_discovery(&gemini, &youtube, &profile, &limits)).await
    {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(DiscoveryError::NoCandidatesFound)) => {
            anyhow::bail!("no similar channels found — try a different channel");
        }
        Ok(Err(DiscoveryError::NoQualityCandidates)) => {
            anyhow::bail!("candidates could not be enriched — the channel may be too niche");
        }
        Err(_) => {
            anyhow::bail!(
                "discovery exceeded the {}s request deadline",
                config.request_deadline_secs
            );
        }
    };

    println!(
        "primary topic: {} (style: {})",
        outcome.analysis.primary_topic, outcome.analysis.style
    );
    println!(
        "topic keywords: {}",
        outcome.analysis.primary_topic_keywords.join(", ")
    );
    println!();
    println!("{} placement candidates:", outcome.placements.len());

    for (rank, placement) in outcome.placements.iter().enumerate() {
        println!(
            "{:>3}. {:<40} subs {:>10}  score {:>5.1}",
            rank + 1,
            placement.channel_name,
            placement.subscriber_count,
            placement.score
        );
        if let Some(url) = placement.custom_url.as_deref() {
            println!("     {url}");
        }
        if let Some(justification) = placement.justification.as_deref() {
            println!("     {justification}");
        }
        for video in placement.evidence.iter().take(2) {
            println!("     matched: {}", video.title);
        }
    }

    Ok(())
}
