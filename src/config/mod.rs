use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GithubConfig,
    pub badges: BadgeConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token for the GraphQL API. The GitHub route returns
    /// a descriptive error when absent; other routes are unaffected.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// Usernames the service will render badges for. Empty means open.
    pub allowed_users: Vec<String>,
    /// TTL for rendered badges, both in the server cache and in the
    /// Cache-Control header attached to responses.
    pub cache_ttl_secs: u64,
    pub cache_max_entries: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for outbound fetches to upstream services.
    pub timeout_secs: u64,
}

impl BadgeConfig {
    const fn default_cache_ttl_secs() -> u64 {
        1800
    }

    const fn default_cache_max_entries() -> u64 {
        1024
    }

    /// True when the allow-list permits this username.
    pub fn allows(&self, username: &str) -> bool {
        self.allowed_users.is_empty()
            || self
                .allowed_users
                .iter()
                .any(|u| u.eq_ignore_ascii_case(username))
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let allowed_users = std::env::var("ALLOWED_USERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let cache_ttl_secs = std::env::var("BADGE_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(BadgeConfig::default_cache_ttl_secs);

        let cache_max_entries = std::env::var("BADGE_CACHE_MAX_ENTRIES")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(BadgeConfig::default_cache_max_entries);

        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        Ok(Config {
            server: ServerConfig { host, port },
            github: GithubConfig { token },
            badges: BadgeConfig {
                allowed_users,
                cache_ttl_secs,
                cache_max_entries,
            },
            http: HttpConfig { timeout_secs },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allow_list_is_open() {
        let badges = BadgeConfig {
            allowed_users: vec![],
            cache_ttl_secs: 60,
            cache_max_entries: 16,
        };
        assert!(badges.allows("anyone"));
    }

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let badges = BadgeConfig {
            allowed_users: vec!["Octocat".to_string()],
            cache_ttl_secs: 60,
            cache_max_entries: 16,
        };
        assert!(badges.allows("octocat"));
        assert!(!badges.allows("someone-else"));
    }
}
