//! Activity source adapters
//!
//! Each upstream service implements [`ActivitySource`]: fetch a historical
//! window of per-day activity counts for one username. Adapters do all the
//! network I/O and normalization quirks; the streak math lives in
//! `crate::stats` and never sees an HTTP response.

pub mod github;
pub mod letterboxd;
pub mod tryhackme;

use async_trait::async_trait;
use thiserror::Error;

use crate::stats::DayRecord;

pub use github::GithubSource;
pub use letterboxd::LetterboxdSource;

/// Merged fetch result for one user: day records plus any activity the
/// upstream reports only as an aggregate (e.g. restricted contributions).
#[derive(Debug, Clone, Default)]
pub struct ActivityWindow {
    /// Unsorted; the aggregator normalizes.
    pub days: Vec<DayRecord>,
    /// Out-of-band total adjustment with no per-day breakdown.
    pub extra_total: u64,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("user '{0}' not found upstream")]
    UserNotFound(String),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("malformed upstream response: {0}")]
    Malformed(String),
    #[error("source not configured: {0}")]
    NotConfigured(&'static str),
}

/// Downloaded avatar bytes plus their content type, for base64 embedding.
#[derive(Debug, Clone)]
pub struct AvatarImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Fetch the historical activity window for `username`.
    async fn fetch_window(&self, username: &str) -> Result<ActivityWindow, SourceError>;

    /// Best-effort avatar for the badge header. Sources without one return
    /// `None`; failures degrade the same way.
    async fn fetch_avatar(&self, _username: &str) -> Option<AvatarImage> {
        None
    }
}
