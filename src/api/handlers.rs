use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::BadgeCache;
use crate::config::BadgeConfig;
use crate::render::{self, BadgeTheme, ThemeQuery};
use crate::sources::tryhackme::TryHackMeSource;
use crate::sources::{ActivitySource, SourceError};
use crate::stats::compute_stats;

pub struct AppState {
    pub badges: BadgeConfig,
    pub github: Arc<dyn ActivitySource>,
    pub letterboxd: Arc<dyn ActivitySource>,
    pub tryhackme: Arc<TryHackMeSource>,
    pub cache: BadgeCache,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}

fn svg_response(svg: String, max_age: u64) -> Response {
    (
        [
            (
                header::CONTENT_TYPE,
                "image/svg+xml; charset=utf-8".to_string(),
            ),
            (header::CACHE_CONTROL, format!("public, max-age={max_age}")),
        ],
        svg,
    )
        .into_response()
}

/// Map an upstream failure to a descriptive HTTP error. Upstream trouble is
/// never rendered as a zeroed badge.
fn error_response(service: &str, username: &str, err: &SourceError) -> Response {
    let status = match err {
        SourceError::UserNotFound(_) => StatusCode::NOT_FOUND,
        SourceError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        SourceError::Upstream(_) | SourceError::Malformed(_) => StatusCode::BAD_GATEWAY,
    };
    warn!(service, user = %username, error = %err, "badge fetch failed");
    (status, err.to_string()).into_response()
}

/// Shared pipeline for streak badge routes: allow-list check, cache lookup,
/// fetch, aggregate, render, cache fill.
async fn streak_badge(
    state: &AppState,
    service: &'static str,
    display_name: &str,
    source: &dyn ActivitySource,
    username: &str,
    query: ThemeQuery,
) -> Response {
    if !state.badges.allows(username) {
        return (StatusCode::NOT_FOUND, "Unknown user").into_response();
    }

    let theme = BadgeTheme::from_name(query.theme.as_deref());
    let max_age = state.badges.cache_ttl_secs;
    let key = BadgeCache::key(service, username, theme.name);

    if let Some(svg) = state.cache.get(&key).await {
        debug!(service, user = %username, "serving cached badge");
        return svg_response(svg, max_age);
    }

    let window = match source.fetch_window(username).await {
        Ok(window) => window,
        Err(err) => return error_response(service, username, &err),
    };

    let stats = compute_stats(&window.days, Utc::now()).with_extra_total(window.extra_total);
    let avatar = source
        .fetch_avatar(username)
        .await
        .map(|a| render::avatar_data_uri(&a.mime, &a.bytes));

    let title = format!("{username} | {display_name}");
    let svg = render::render_streak_badge(&title, &stats, theme, avatar.as_deref());
    state.cache.insert(key, svg.clone()).await;
    svg_response(svg, max_age)
}

/// GitHub contribution streak badge
pub async fn github_badge(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<ThemeQuery>,
) -> Response {
    let source = Arc::clone(&state.github);
    streak_badge(&state, "github", "GitHub", source.as_ref(), &username, query).await
}

/// Letterboxd diary streak badge
pub async fn letterboxd_badge(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<ThemeQuery>,
) -> Response {
    let source = Arc::clone(&state.letterboxd);
    streak_badge(
        &state,
        "letterboxd",
        "Letterboxd",
        source.as_ref(),
        &username,
        query,
    )
    .await
}

/// TryHackMe profile stat badge (no day-level history upstream)
pub async fn tryhackme_badge(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<ThemeQuery>,
) -> Response {
    if !state.badges.allows(&username) {
        return (StatusCode::NOT_FOUND, "Unknown user").into_response();
    }

    let theme = BadgeTheme::from_name(query.theme.as_deref());
    let max_age = state.badges.cache_ttl_secs;
    let key = BadgeCache::key("tryhackme", &username, theme.name);

    if let Some(svg) = state.cache.get(&key).await {
        return svg_response(svg, max_age);
    }

    let profile = match state.tryhackme.fetch_profile(&username).await {
        Ok(profile) => profile,
        Err(err) => return error_response("tryhackme", &username, &err),
    };

    let rows = [
        ("Rank", format!("#{}", profile.rank)),
        ("Points", profile.points.to_string()),
        ("Rooms Completed", profile.rooms_completed.to_string()),
    ];
    let title = format!("{username} | TryHackMe");
    let svg = render::render_stat_badge(&title, &rows, theme);
    state.cache.insert(key, svg.clone()).await;
    svg_response(svg, max_age)
}
