use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{MoodlogError, Result};
use crate::tracker::CollisionPolicy;

pub const DEFAULT_DB_PATH: &str = "moodlog.db";
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the server and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
    /// Which same-day entry the tracker shows
    pub collision: CollisionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            collision: CollisionPolicy::default(),
        }
    }
}

impl Config {
    /// Read `MOODLOG_DB`, `MOODLOG_ADDR` and `MOODLOG_COLLISION`, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(db) = lookup("MOODLOG_DB") {
            config.db_path = PathBuf::from(db);
        }
        if let Some(addr) = lookup("MOODLOG_ADDR") {
            config.addr = parse_addr(&addr)?;
        }
        if let Some(collision) = lookup("MOODLOG_COLLISION") {
            config.collision = collision.parse()?;
        }

        Ok(config)
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        db_path: Option<PathBuf>,
        addr: Option<String>,
        collision: Option<String>,
    ) -> Result<Self> {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(addr) = addr {
            self.addr = parse_addr(&addr)?;
        }
        if let Some(collision) = collision {
            self.collision = collision.parse()?;
        }
        Ok(self)
    }
}

fn parse_addr(addr: &str) -> Result<SocketAddr> {
    addr.parse()
        .map_err(|_| MoodlogError::InvalidAddress(addr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.db_path, PathBuf::from("moodlog.db"));
        assert_eq!(config.addr.port(), 5000);
        assert_eq!(config.collision, CollisionPolicy::Earliest);
    }

    #[test]
    fn test_from_env_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("MOODLOG_DB", "/tmp/moods.db"),
            ("MOODLOG_ADDR", "0.0.0.0:8080"),
            ("MOODLOG_COLLISION", "latest"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/moods.db"));
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.collision, CollisionPolicy::Latest);
    }

    #[test]
    fn test_from_env_rejects_bad_addr() {
        let result = Config::from_lookup(lookup_from(&[("MOODLOG_ADDR", "localhost")]));
        assert!(matches!(result, Err(MoodlogError::InvalidAddress(_))));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default()
            .with_overrides(
                Some(PathBuf::from("other.db")),
                Some("127.0.0.1:9000".to_string()),
                Some("latest".to_string()),
            )
            .unwrap();

        assert_eq!(config.db_path, PathBuf::from("other.db"));
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.collision, CollisionPolicy::Latest);
    }

    #[test]
    fn test_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
