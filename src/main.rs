mod api;
mod cache;
mod config;
mod render;
mod sources;
mod stats;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use api::AppState;
use cache::BadgeCache;
use config::Config;
use sources::tryhackme::TryHackMeSource;
use sources::{ActivitySource, GithubSource, LetterboxdSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    if config.github.token.is_some() {
        info!("🔑 GitHub token configured, /github badges enabled");
    } else {
        info!("🔑 No GitHub token, /github badges will return 503");
    }
    if config.badges.allowed_users.is_empty() {
        info!("🔓 No allow-list configured, badges served for any username");
    } else {
        info!(
            "🔐 Serving badges for {} allowed user(s)",
            config.badges.allowed_users.len()
        );
    }

    // Shared HTTP client for all upstream fetches
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()?;

    let github: Arc<dyn ActivitySource> =
        Arc::new(GithubSource::new(client.clone(), config.github.token.clone()));
    let letterboxd: Arc<dyn ActivitySource> = Arc::new(LetterboxdSource::new(client.clone()));
    let tryhackme = Arc::new(TryHackMeSource::new(client));

    let cache = BadgeCache::new(
        config.badges.cache_max_entries,
        config.badges.cache_ttl_secs,
    );

    let state = Arc::new(AppState {
        badges: config.badges.clone(),
        github,
        letterboxd,
        tryhackme,
        cache,
    });
    let router = api::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Badge server listening on http://{}", addr);
    info!("   - Streak badges at /github/{{username}} and /letterboxd/{{username}}");
    info!("   - Profile badges at /tryhackme/{{username}}");

    axum::serve(listener, router).await?;

    Ok(())
}
