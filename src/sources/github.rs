//! GitHub contribution calendar adapter
//!
//! The GraphQL contributions collection only answers for a one-year span,
//! so the adapter first resolves the account creation date, then issues one
//! calendar query per account year concurrently and merges the results into
//! a single unsorted day list. Contributions to private repositories are
//! reported only as an aggregate (`restrictedContributionsCount`) and are
//! carried as the window's extra total.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::sources::{ActivitySource, ActivityWindow, AvatarImage, SourceError};
use crate::stats::DayRecord;

const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = concat!("streakline/", env!("CARGO_PKG_VERSION"));

const PROFILE_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    createdAt
    avatarUrl(size: 96)
  }
}"#;

const CALENDAR_QUERY: &str = r#"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      restrictedContributionsCount
      contributionCalendar {
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}"#;

pub struct GithubSource {
    client: reqwest::Client,
    token: Option<String>,
}

impl GithubSource {
    pub fn new(client: reqwest::Client, token: Option<String>) -> Self {
        Self { client, token }
    }

    fn token(&self) -> Result<&str, SourceError> {
        self.token
            .as_deref()
            .ok_or(SourceError::NotConfigured("GITHUB_TOKEN is not set"))
    }

    async fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, SourceError> {
        let token = self.token()?;
        let response = self
            .client
            .post(GRAPHQL_ENDPOINT)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let body: GraphqlResponse = response.json().await?;
        if let Some(errors) = body.errors {
            if errors.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND")) {
                let login = variables["login"].as_str().unwrap_or_default();
                return Err(SourceError::UserNotFound(login.to_string()));
            }
            let message = errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "unknown GraphQL error".to_string());
            return Err(SourceError::Malformed(message));
        }
        body.data
            .ok_or_else(|| SourceError::Malformed("response has no data field".to_string()))
    }

    async fn fetch_profile(&self, login: &str) -> Result<Profile, SourceError> {
        let data = self.graphql(PROFILE_QUERY, json!({ "login": login })).await?;
        let user = data
            .get("user")
            .filter(|u| !u.is_null())
            .ok_or_else(|| SourceError::UserNotFound(login.to_string()))?;
        serde_json::from_value(user.clone())
            .map_err(|e| SourceError::Malformed(format!("profile: {e}")))
    }

    /// Fetch the calendar for one year-long span starting at `from`.
    async fn fetch_span(
        &self,
        login: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<(Vec<DayRecord>, u64), SourceError> {
        let data = self
            .graphql(
                CALENDAR_QUERY,
                json!({
                    "login": login,
                    "from": from.to_rfc3339(),
                    "to": to.to_rfc3339(),
                }),
            )
            .await?;

        let collection: ContributionsCollection = data
            .pointer("/user/contributionsCollection")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .ok_or_else(|| {
                SourceError::Malformed("missing contributionsCollection".to_string())
            })?;

        let mut days = Vec::new();
        for week in collection.contribution_calendar.weeks {
            for day in week.contribution_days {
                let date = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
                    .map_err(|e| SourceError::Malformed(format!("bad date '{}': {e}", day.date)))?;
                days.push(DayRecord::new(date, day.contribution_count));
            }
        }
        Ok((days, collection.restricted_contributions_count))
    }
}

#[async_trait]
impl ActivitySource for GithubSource {
    async fn fetch_window(&self, username: &str) -> Result<ActivityWindow, SourceError> {
        let profile = self.fetch_profile(username).await?;
        let created_at = DateTime::parse_from_rfc3339(&profile.created_at)
            .map_err(|e| SourceError::Malformed(format!("createdAt: {e}")))?
            .with_timezone(&Utc);
        let now = Utc::now();

        // One span per account year, concurrent. Spans are clamped so the
        // last one ends at the current instant.
        let mut spans = Vec::new();
        let mut from = created_at;
        while from < now {
            let next = (from + chrono::Months::new(12)).min(now);
            spans.push(self.fetch_span(username, from, next));
            from = next;
        }
        debug!(user = %username, spans = spans.len(), "fetching contribution calendar");

        let results = try_join_all(spans).await?;

        let mut window = ActivityWindow::default();
        for (days, restricted) in results {
            window.days.extend(days);
            window.extra_total += restricted;
        }
        Ok(window)
    }

    /// Any failure here degrades to no avatar rather than failing the badge.
    async fn fetch_avatar(&self, username: &str) -> Option<AvatarImage> {
        let profile = self.fetch_profile(username).await.ok()?;
        let response = self
            .client
            .get(&profile.avatar_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;
        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await.ok()?.to_vec();
        Some(AvatarImage { bytes, mime })
    }
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct Profile {
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(rename = "avatarUrl")]
    avatar_url: String,
}

#[derive(Deserialize)]
struct ContributionsCollection {
    #[serde(rename = "restrictedContributionsCount")]
    restricted_contributions_count: u64,
    #[serde(rename = "contributionCalendar")]
    contribution_calendar: ContributionCalendar,
}

#[derive(Deserialize)]
struct ContributionCalendar {
    weeks: Vec<Week>,
}

#[derive(Deserialize)]
struct Week {
    #[serde(rename = "contributionDays")]
    contribution_days: Vec<ContributionDay>,
}

#[derive(Deserialize)]
struct ContributionDay {
    date: String,
    #[serde(rename = "contributionCount")]
    contribution_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_payload_parses() {
        let raw = serde_json::json!({
            "restrictedContributionsCount": 12,
            "contributionCalendar": {
                "weeks": [
                    { "contributionDays": [
                        { "date": "2024-01-01", "contributionCount": 3 },
                        { "date": "2024-01-02", "contributionCount": 0 }
                    ]}
                ]
            }
        });
        let parsed: ContributionsCollection = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.restricted_contributions_count, 12);
        assert_eq!(
            parsed.contribution_calendar.weeks[0].contribution_days[0].contribution_count,
            3
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_descriptive() {
        let source = GithubSource::new(reqwest::Client::new(), None);
        let err = source.fetch_window("octocat").await.unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured(_)));
    }
}
