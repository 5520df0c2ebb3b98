/// Station registry loader - parses stations.toml
///
/// Separates the station table from code, making it easy to add or
/// retire stations without recompiling the service. The registry is
/// loaded once at startup and never changes for the process lifetime.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// One monitored station: a human-readable name (the downstream message
/// key) and the measurement endpoint it is polled from.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub url: String,
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Deserialize)]
struct StationRegistry {
    station: Vec<StationConfig>,
}

/// Loads the station registry from the given TOML file.
///
/// Station order is incidental — every station is processed
/// independently each cycle, so nothing may rely on iteration order.
///
/// # Panics
/// Panics if the file is missing or malformed. This is intentional —
/// the service cannot operate without a station table.
pub fn load_config(path: &str) -> Vec<StationConfig> {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));

    let registry: StationRegistry = toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e));

    registry.station
}

/// Loads the station registry and builds a lookup map keyed by name.
pub fn load_config_map(path: &str) -> HashMap<String, StationConfig> {
    load_config(path)
        .into_iter()
        .map(|s| (s.name.clone(), s))
        .collect()
}
