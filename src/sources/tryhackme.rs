//! TryHackMe profile adapter
//!
//! No feed or API is exposed for public profiles, so this scrapes the
//! embedded stats out of the profile page HTML. The page is not a stable
//! interface; the regexes match the inlined JSON blobs and nothing more.
//! There is no per-day history here, so this source feeds the plain stat
//! badge instead of the streak aggregator.

use regex::Regex;

use crate::sources::SourceError;

const PROFILE_URL: &str = "https://tryhackme.com/p";

/// Scraped headline stats from a public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryHackMeProfile {
    pub rank: u64,
    pub points: u64,
    pub rooms_completed: u64,
}

pub struct TryHackMeSource {
    client: reqwest::Client,
}

impl TryHackMeSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<TryHackMeProfile, SourceError> {
        let response = self
            .client
            .get(format!("{PROFILE_URL}/{username}"))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::UserNotFound(username.to_string()));
        }
        let html = response.error_for_status()?.text().await?;

        profile_from_html(&html).ok_or_else(|| {
            SourceError::Malformed("profile page has no recognizable stats".to_string())
        })
    }
}

fn scrape_number(html: &str, pattern: &str) -> Option<u64> {
    // Patterns are fixed literals, so compilation cannot fail at runtime.
    let re = Regex::new(pattern).ok()?;
    re.captures(html)?.get(1)?.as_str().parse().ok()
}

fn profile_from_html(html: &str) -> Option<TryHackMeProfile> {
    let rank = scrape_number(html, r#""userRank"\s*:\s*(\d+)"#)?;
    let points = scrape_number(html, r#""points"\s*:\s*(\d+)"#)?;
    let rooms_completed = scrape_number(html, r#""completedRoomsNumber"\s*:\s*(\d+)"#).unwrap_or(0);
    Some(TryHackMeProfile {
        rank,
        points,
        rooms_completed,
    })
}
