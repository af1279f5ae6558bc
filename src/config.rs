// src/config.rs
//
// Runtime configuration.
//
// Defaults match the original tracker; the environment and then CLI flags
// override them.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_OMDB_API_KEY: &str = "4e9504cc";

pub const ENV_OMDB_KEY: &str = "MOVIETRACKER_OMDB_KEY";
pub const ENV_OMDB_URL: &str = "MOVIETRACKER_OMDB_URL";
pub const ENV_DATABASE: &str = "MOVIETRACKER_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OMDB_URL.to_string(),
            api_key: DEFAULT_OMDB_API_KEY.to_string(),
            timeout_secs: 15,
        }
    }
}

impl OmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub omdb: OmdbConfig,

    /// How long a requested delete waits for the removal transition
    pub delete_delay_ms: i64,

    /// Slot database file; `None` uses the per-user data directory
    pub database_path: Option<PathBuf>,

    /// Keep slots in memory only
    pub ephemeral: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            omdb: OmdbConfig::default(),
            delete_delay_ms: 250,
            database_path: None,
            ephemeral: false,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `MOVIETRACKER_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_OMDB_KEY).filter(|v| !v.trim().is_empty()) {
            config.omdb.api_key = key;
        }
        if let Some(url) = lookup(ENV_OMDB_URL).filter(|v| !v.trim().is_empty()) {
            config.omdb.base_url = url;
        }
        if let Some(path) = lookup(ENV_DATABASE).filter(|v| !v.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.delete_delay_ms, 250);
        assert_eq!(config.omdb.base_url, DEFAULT_OMDB_URL);
        assert!(config.database_path.is_none());
        assert!(!config.ephemeral);
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_OMDB_KEY, "secret"),
            (ENV_OMDB_URL, "http://localhost:9000/"),
            (ENV_DATABASE, "/tmp/movies.db"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.omdb.api_key, "secret");
        assert_eq!(config.omdb.base_url, "http://localhost:9000/");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/movies.db")));
    }

    #[test]
    fn test_blank_environment_values_are_ignored() {
        let config = AppConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, AppConfig::default());
    }
}
