//! `tubescout classify` — print the topic analysis for a channel.

use tubescout_core::AppConfig;

use crate::{build_gemini, build_youtube, resolve_profile, ClassifyArgs};

pub(crate) async fn run(config: &AppConfig, args: &ClassifyArgs) -> anyhow::Result<()> {
    let youtube = build_youtube(config)?;
    let gemini = build_gemini(config)?;

    let profile = resolve_profile(&youtube, &args.profile).await?;
    let analysis = tubescout_discovery::classify(&gemini, &profile).await;

    println!("channel:           {}", profile.name);
    println!("primary topic:     {}", analysis.primary_topic);
    println!("style:             {}", analysis.style);
    println!("niche:             {}", analysis.niche);
    println!("audience interest: {}", analysis.audience_interest);
    println!("language:          {}", analysis.language);
    println!(
        "topic keywords:    {}",
        analysis.primary_topic_keywords.join(", ")
    );
    println!("search queries:");
    for query in &analysis.search_queries {
        println!("  - {query}");
    }

    Ok(())
}
