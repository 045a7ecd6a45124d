use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers::{
    github_badge, health_check, letterboxd_badge, tryhackme_badge, AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/github/{username}", get(github_badge))
        .route("/letterboxd/{username}", get(letterboxd_badge))
        .route("/tryhackme/{username}", get(tryhackme_badge))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
