//! Configuration module for the roster backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;

/// Public fansaka live scoring feed.
pub const DEFAULT_FEED_URL: &str = "https://www.fansaka.info/xml/sokuho.xml";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// State store location, `redis://...` or a SQLite path
    pub store_url: String,
    /// Upstream player feed URL
    pub feed_url: String,
    /// Timeout applied to each feed fetch
    pub feed_timeout: Duration,
    /// User ids allowed to read and manage rosters
    pub allowed_user_ids: Vec<String>,
    /// Bank money a user starts each gameweek with
    pub starting_budget: i64,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("ROSTER_API_PSK").ok().filter(|k| !k.is_empty());

        let store_url = env::var("ROSTER_STORE_URL")
            .unwrap_or_else(|_| "sqlite:./data/rosters.sqlite".to_string());

        let feed_url = env::var("ROSTER_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());

        let feed_timeout = env::var("ROSTER_FEED_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| AppError::Config(format!("Invalid ROSTER_FEED_TIMEOUT_SECS: {}", e)))?;

        let allowed_user_ids = parse_user_list(
            &env::var("ROSTER_ALLOWED_USERS").unwrap_or_else(|_| "1,2,3,4".to_string()),
        );

        let starting_budget = env::var("ROSTER_STARTING_BUDGET")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<i64>()
            .map_err(|e| AppError::Config(format!("Invalid ROSTER_STARTING_BUDGET: {}", e)))?;
        if starting_budget < 0 {
            return Err(AppError::Config(
                "ROSTER_STARTING_BUDGET must not be negative".to_string(),
            ));
        }

        let bind_addr = env::var("ROSTER_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid ROSTER_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_psk,
            store_url,
            feed_url,
            feed_timeout,
            allowed_user_ids,
            starting_budget,
            bind_addr,
            log_level,
        })
    }

    /// Whether the user id is on the configured allow-list.
    pub fn is_allowed_user(&self, user_id: &str) -> bool {
        self.allowed_user_ids.iter().any(|id| id == user_id)
    }
}

fn parse_user_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "ROSTER_API_PSK",
        "ROSTER_STORE_URL",
        "ROSTER_FEED_URL",
        "ROSTER_FEED_TIMEOUT_SECS",
        "ROSTER_ALLOWED_USERS",
        "ROSTER_STARTING_BUDGET",
        "ROSTER_BIND_ADDR",
        "ROSTER_LOG_LEVEL",
    ];

    // Both cases mutate the process environment, so they run in one test.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.store_url, "sqlite:./data/rosters.sqlite");
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.feed_timeout, Duration::from_secs(10));
        assert_eq!(config.allowed_user_ids, vec!["1", "2", "3", "4"]);
        assert_eq!(config.starting_budget, 1000);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.log_level, "info");

        env::set_var("ROSTER_STARTING_BUDGET", "lots");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_allow_list() {
        let users = parse_user_list(" 7, 12 ,,alice ");
        assert_eq!(users, vec!["7", "12", "alice"]);

        let config = Config {
            api_psk: None,
            store_url: "sqlite::memory:".to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_timeout: Duration::from_secs(1),
            allowed_user_ids: users,
            starting_budget: 100,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };
        assert!(config.is_allowed_user("12"));
        assert!(!config.is_allowed_user("1"));
    }
}
