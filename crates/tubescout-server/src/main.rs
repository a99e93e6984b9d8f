mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(tubescout_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let youtube = tubescout_youtube::YouTubeClient::new(
        &config.youtube_api_key,
        config.request_timeout_secs,
        &config.http_user_agent,
    )?
    .with_retry_policy(config.max_retries, config.retry_backoff_base_ms);

    let gemini = match config.gemini_api_key.as_deref() {
        Some(key) => Some(tubescout_gemini::GeminiClient::new(
            key,
            &config.gemini_model,
            config.request_timeout_secs,
        )?),
        None => {
            tracing::warn!(
                "GEMINI_API_KEY not set; classification and scoring use deterministic fallbacks"
            );
            None
        }
    };

    let app = build_app(AppState {
        config: Arc::clone(&config),
        youtube,
        gemini,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "tubescout-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
