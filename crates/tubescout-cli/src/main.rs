mod classify;
mod discover;

use clap::{Args, Parser, Subcommand};

use tubescout_core::AppConfig;
use tubescout_discovery::ChannelProfile;
use tubescout_gemini::GeminiClient;
use tubescout_youtube::YouTubeClient;

#[derive(Debug, Parser)]
#[command(name = "tubescout")]
#[command(about = "Placement Finder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the topic analysis for a channel
    Classify(ClassifyArgs),
    /// Run the full placement discovery pipeline
    Discover(DiscoverArgs),
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// Source channel id; the profile is fetched from channel details and
    /// recent uploads
    #[arg(
        long,
        conflicts_with_all = ["name", "titles", "descriptions", "tags"]
    )]
    channel_id: Option<String>,

    /// Inline profile: channel name
    #[arg(long)]
    name: Option<String>,

    /// Inline profile: recent video title (repeatable)
    #[arg(long = "title")]
    titles: Vec<String>,

    /// Inline profile: recent video description (repeatable)
    #[arg(long = "description")]
    descriptions: Vec<String>,

    /// Inline profile: channel tag (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    #[command(flatten)]
    profile: ProfileArgs,
}

#[derive(Debug, Args)]
struct DiscoverArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Skip generator-based scoring; rank by keyword overlap only
    #[arg(long)]
    no_llm_score: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = tubescout_core::load_app_config()?;

    match cli.command {
        Commands::Classify(args) => classify::run(&config, &args).await,
        Commands::Discover(args) => discover::run(&config, &args).await,
    }
}

fn build_youtube(config: &AppConfig) -> anyhow::Result<YouTubeClient> {
    Ok(YouTubeClient::new(
        &config.youtube_api_key,
        config.request_timeout_secs,
        &config.http_user_agent,
    )?
    .with_retry_policy(config.max_retries, config.retry_backoff_base_ms))
}

fn build_gemini(config: &AppConfig) -> anyhow::Result<Option<GeminiClient>> {
    match config.gemini_api_key.as_deref() {
        Some(key) => Ok(Some(GeminiClient::new(
            key,
            &config.gemini_model,
            config.request_timeout_secs,
        )?)),
        None => {
            tracing::warn!(
                "GEMINI_API_KEY not set; classification and scoring use deterministic fallbacks"
            );
            Ok(None)
        }
    }
}

/// Resolves the source profile from either `--channel-id` or the inline
/// profile flags.
async fn resolve_profile(
    youtube: &YouTubeClient,
    args: &ProfileArgs,
) -> anyhow::Result<ChannelProfile> {
    if let Some(channel_id) = args.channel_id.as_deref() {
        return Ok(tubescout_discovery::load_profile(youtube, channel_id).await?);
    }

    let Some(name) = args.name.as_deref() else {
        anyhow::bail!("provide --channel-id or an inline profile via --name/--title/--tag");
    };

    Ok(ChannelProfile::sampled(
        "",
        name,
        args.titles.clone(),
        args.descriptions.clone(),
        args.tags.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_discover_with_inline_profile() {
        let cli = Cli::try_parse_from([
            "tubescout",
            "discover",
            "--name",
            "HolidayBeats",
            "--title",
            "Jingle Bell Rock Cover",
            "--tag",
            "christmas",
            "--no-llm-score",
        ])
        .expect("parse");
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover command");
        };
        assert!(args.no_llm_score);
        assert_eq!(args.profile.name.as_deref(), Some("HolidayBeats"));
        assert_eq!(args.profile.titles, vec!["Jingle Bell Rock Cover"]);
        assert_eq!(args.profile.tags, vec!["christmas"]);
    }

    #[test]
    fn channel_id_conflicts_with_inline_profile() {
        let result = Cli::try_parse_from([
            "tubescout",
            "classify",
            "--channel-id",
            "UCsrc",
            "--name",
            "HolidayBeats",
        ]);
        assert!(result.is_err(), "expected conflict error");
    }

    #[test]
    fn parses_classify_with_channel_id() {
        let cli = Cli::try_parse_from(["tubescout", "classify", "--channel-id", "UCsrc"])
            .expect("parse");
        let Commands::Classify(args) = cli.command else {
            panic!("expected classify command");
        };
        assert_eq!(args.profile.channel_id.as_deref(), Some("UCsrc"));
    }
}
