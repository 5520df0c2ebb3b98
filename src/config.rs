/// Service configuration loader - parses aqmon.toml
///
/// Separates deployment details (broker addresses, topic name, poll
/// interval, time zone) from code, so the service can be repointed at a
/// different cluster or zone without recompiling.

use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;

/// Service configuration loaded from aqmon.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Kafka bootstrap broker addresses
    pub brokers: Vec<String>,

    /// Topic new readings are published to
    pub topic: String,

    /// How often to poll the station endpoints (default: 10 minutes,
    /// matching the upstream publication cadence)
    #[serde(default = "default_poll_interval_minutes")]
    pub poll_interval_minutes: u64,

    /// IANA zone identifier the upstream observation times are local to.
    /// The API reports "YYYY-MM-DD HH:MM:SS" with no zone designator.
    pub time_zone: String,

    /// Per-request timeout for station fetches (default: 30 seconds)
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
}

fn default_poll_interval_minutes() -> u64 {
    10
}

fn default_http_timeout_seconds() -> u64 {
    30
}

impl ServiceConfig {
    /// Resolves the configured zone identifier against the IANA database.
    pub fn zone(&self) -> Result<Tz, String> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|e| format!("invalid time zone '{}': {}", self.time_zone, e))
    }
}

/// Loads service configuration from the given TOML file.
///
/// # Panics
/// Panics if the configuration file is missing, malformed, or contains
/// invalid data. This is intentional — the service cannot operate without
/// broker addresses and a topic.
pub fn load_config(path: &str) -> ServiceConfig {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));

    toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}
