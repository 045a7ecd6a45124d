//! Router-level integration tests
//!
//! The activity sources are stubbed behind the `ActivitySource` trait so
//! these run without a network. Each test drives the real router with
//! `tower::ServiceExt::oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;

use streakline::api::{create_router, AppState};
use streakline::cache::BadgeCache;
use streakline::config::BadgeConfig;
use streakline::sources::tryhackme::TryHackMeSource;
use streakline::sources::{ActivitySource, ActivityWindow, SourceError};
use streakline::stats::DayRecord;

/// Stub source: three consecutive active days ending today, and a fetch
/// counter so tests can observe cache hits.
struct StubSource {
    calls: AtomicUsize,
    result: fn(&str) -> Result<ActivityWindow, SourceError>,
}

impl StubSource {
    fn active_three_days() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: |_| {
                let today = Utc::now().date_naive();
                Ok(ActivityWindow {
                    days: vec![
                        DayRecord::new(today - Duration::days(2), 1),
                        DayRecord::new(today - Duration::days(1), 2),
                        DayRecord::new(today, 1),
                    ],
                    extra_total: 0,
                })
            },
        }
    }

    fn user_not_found() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: |user| Err(SourceError::UserNotFound(user.to_string())),
        }
    }
}

#[async_trait]
impl ActivitySource for StubSource {
    async fn fetch_window(&self, username: &str) -> Result<ActivityWindow, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.result)(username)
    }
}

fn test_state(github: Arc<StubSource>, allowed_users: Vec<String>) -> Arc<AppState> {
    Arc::new(AppState {
        badges: BadgeConfig {
            allowed_users,
            cache_ttl_secs: 300,
            cache_max_entries: 16,
        },
        github,
        letterboxd: Arc::new(StubSource::active_three_days()),
        tryhackme: Arc::new(TryHackMeSource::new(reqwest::Client::new())),
        cache: BadgeCache::new(16, 300),
    })
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let router = create_router(test_state(Arc::new(StubSource::active_three_days()), vec![]));
    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("OK"));
}

#[tokio::test]
async fn test_github_badge_renders_streaks_with_caching_headers() {
    let router = create_router(test_state(Arc::new(StubSource::active_three_days()), vec![]));
    let response = router.oneshot(get("/github/octocat")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "image/svg+xml; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=300"
    );

    let svg = body_string(response).await;
    assert!(svg.contains("octocat | GitHub"));
    assert!(svg.contains("Current Streak"));
    assert!(svg.contains(">3<"));
    assert!(svg.contains(">4<")); // total = 1 + 2 + 1
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let stub = Arc::new(StubSource::active_three_days());
    let router = create_router(test_state(Arc::clone(&stub), vec![]));

    let first = router.clone().oneshot(get("/github/octocat")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = router.oneshot(get("/github/octocat")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_themes_are_cached_separately() {
    let stub = Arc::new(StubSource::active_three_days());
    let router = create_router(test_state(Arc::clone(&stub), vec![]));

    let light = router
        .clone()
        .oneshot(get("/github/octocat"))
        .await
        .unwrap();
    let dark = router
        .oneshot(get("/github/octocat?theme=dark"))
        .await
        .unwrap();

    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    assert!(body_string(light).await.contains("#fffefe"));
    assert!(body_string(dark).await.contains("#151515"));
}

#[tokio::test]
async fn test_disallowed_username_is_not_found() {
    let stub = Arc::new(StubSource::active_three_days());
    let router = create_router(test_state(
        Arc::clone(&stub),
        vec!["octocat".to_string()],
    ));

    let response = router
        .clone()
        .oneshot(get("/github/stranger"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    // The allow-list rejects before any upstream fetch.
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);

    let allowed = router.oneshot(get("/github/octocat")).await.unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_upstream_user_maps_to_not_found() {
    let router = create_router(test_state(Arc::new(StubSource::user_not_found()), vec![]));
    let response = router.oneshot(get("/github/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("ghost"));
}

#[tokio::test]
async fn test_letterboxd_route_uses_its_own_source() {
    let github = Arc::new(StubSource::user_not_found());
    let router = create_router(test_state(Arc::clone(&github), vec![]));

    let response = router.oneshot(get("/letterboxd/cinephile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response)
        .await
        .contains("cinephile | Letterboxd"));
    assert_eq!(github.calls.load(Ordering::SeqCst), 0);
}
