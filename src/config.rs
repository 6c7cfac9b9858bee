//! Configuration
//!
//! Relay settings read from environment variables.

use std::str::FromStr;
use std::time::Duration;

/// One configured endpoint: `file:<path>` or `socket:<address>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointSpec {
    File(String),
    Socket(String),
}

impl FromStr for EndpointSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidEndpoint(s.to_string());

        let (kind, target) = s.split_once(':').ok_or_else(invalid)?;
        if target.is_empty() {
            return Err(invalid());
        }
        match kind {
            "file" => Ok(Self::File(target.to_string())),
            "socket" => Ok(Self::Socket(target.to_string())),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid endpoint {0:?}: expected file:<path> or socket:<address>")]
    InvalidEndpoint(String),
    #[error("no sources configured (set RELAY_SOURCES)")]
    NoSources,
    #[error("no destinations configured (set RELAY_DESTINATIONS)")]
    NoDestinations,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sources: Vec<EndpointSpec>,
    pub destinations: Vec<EndpointSpec>,
    pub append_newline: bool,
    pub queue_capacity: usize,
    pub close_timeout_secs: u64,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            destinations: Vec::new(),
            append_newline: false,
            queue_capacity: 10,
            close_timeout_secs: 5,
            debug: false,
        }
    }
}

impl Config {
    /// Build a config from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let sources = parse_endpoints(lookup("RELAY_SOURCES"))?;
        let destinations = parse_endpoints(lookup("RELAY_DESTINATIONS"))?;

        let append_newline = lookup("RELAY_APPEND_NEWLINE")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(defaults.append_newline);

        let queue_capacity = lookup("RELAY_QUEUE_CAPACITY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.queue_capacity);

        let close_timeout_secs = lookup("RELAY_CLOSE_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.close_timeout_secs);

        let debug = lookup("DEBUG").is_some();

        Ok(Config {
            sources,
            destinations,
            append_newline,
            queue_capacity,
            close_timeout_secs,
            debug,
        })
    }

    /// Reject configurations that cannot relay anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.destinations.is_empty() {
            return Err(ConfigError::NoDestinations);
        }
        Ok(())
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_secs(self.close_timeout_secs)
    }
}

fn parse_endpoints(raw: Option<String>) -> Result<Vec<EndpointSpec>, ConfigError> {
    raw.map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(EndpointSpec::from_str)
            .collect()
    })
    .unwrap_or_else(|| Ok(Vec::new()))
}

pub fn load_config() -> anyhow::Result<Config> {
    Ok(Config::from_lookup(|key| std::env::var(key).ok())?)
}
