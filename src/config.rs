use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const ADDR_ENV: &str = "TASK_PLANNER_HTTP_ADDR";
pub const DB_PATH_ENV: &str = "TASK_PLANNER_DB_PATH";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TASK_PLANNER_HTTP_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// SQLite database file. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: raw_addr.clone(),
                source,
            })?;
        let db_path = lookup(DB_PATH_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self { addr, db_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory_store_on_port_3000() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn reads_address_and_db_path() {
        let config = ServerConfig::from_lookup(|key| match key {
            ADDR_ENV => Some("127.0.0.1:8080".to_string()),
            DB_PATH_ENV => Some("/tmp/planner.db".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/planner.db")));
    }

    #[test]
    fn rejects_malformed_address() {
        let err = ServerConfig::from_lookup(|key| (key == ADDR_ENV).then(|| "nope".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
