//! Letterboxd diary adapter
//!
//! The public RSS feed lists recently logged films. Each item's publication
//! date (UTC) becomes one unit of activity on that calendar day; the window
//! is only as deep as the feed, roughly the last 50 entries.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use rss::Channel;
use tracing::debug;

use crate::sources::{ActivitySource, ActivityWindow, SourceError};
use crate::stats::DayRecord;

pub struct LetterboxdSource {
    client: reqwest::Client,
}

impl LetterboxdSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn feed_url(username: &str) -> String {
        format!("https://letterboxd.com/{username}/rss/")
    }
}

/// Bucket feed items into per-day counts. Pulled out of the fetch path so
/// the parsing is testable without a network.
fn window_from_channel(channel: &Channel) -> Result<ActivityWindow, SourceError> {
    let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();

    for item in channel.items() {
        let Some(pub_date) = item.pub_date() else {
            continue;
        };
        let date = DateTime::parse_from_rfc2822(pub_date)
            .map_err(|e| SourceError::Malformed(format!("bad pubDate '{pub_date}': {e}")))?
            .to_utc()
            .date_naive();
        *per_day.entry(date).or_insert(0) += 1;
    }

    Ok(ActivityWindow {
        days: per_day
            .into_iter()
            .map(|(date, count)| DayRecord::new(date, count))
            .collect(),
        extra_total: 0,
    })
}

#[async_trait]
impl ActivitySource for LetterboxdSource {
    async fn fetch_window(&self, username: &str) -> Result<ActivityWindow, SourceError> {
        let response = self.client.get(Self::feed_url(username)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::UserNotFound(username.to_string()));
        }
        let bytes = response.error_for_status()?.bytes().await?;

        let channel = Channel::read_from(&bytes[..])
            .map_err(|e| SourceError::Malformed(format!("rss: {e}")))?;
        debug!(user = %username, items = channel.items().len(), "parsed letterboxd feed");

        window_from_channel(&channel)
    }
}
