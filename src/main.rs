//! Air Quality Producer - Main Daemon
//!
//! A server-side daemon that continuously:
//! 1. Polls GIOS air-quality station endpoints on a fixed interval
//! 2. Extracts the latest observation per station
//! 3. Publishes readings not yet seen to a Kafka topic, keyed by station
//!
//! Usage:
//!   cargo run --release                       # aqmon.toml + stations.toml in cwd
//!   cargo run --release -- --config prod.toml # alternate service config
//!
//! Per-cycle errors are logged and non-fatal; the only fatal condition
//! is failing to reach the Kafka cluster at startup.

use std::env;
use std::error::Error;
use std::time::Duration;

use aqmon_service::config;
use aqmon_service::daemon::Daemon;
use aqmon_service::ingest::HttpSource;
use aqmon_service::publish::KafkaSink;
use aqmon_service::stations;
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path = String::from("aqmon.toml");
    let mut stations_path = String::from("stations.toml");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = args[i + 1].clone();
                i += 2;
            }
            "--stations" if i + 1 < args.len() => {
                stations_path = args[i + 1].clone();
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: {} [--config PATH] [--stations PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = run(&config_path, &stations_path) {
        eprintln!("Fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(config_path: &str, stations_path: &str) -> Result<(), Box<dyn Error>> {
    let config = config::load_config(config_path);
    let stations = stations::load_config(stations_path);

    if stations.is_empty() {
        return Err(format!("no stations configured in {}", stations_path).into());
    }

    let zone = config.zone()?;
    let source = HttpSource::new(Duration::from_secs(config.http_timeout_seconds))?;

    // Fatal if the cluster is unreachable; everything after this point
    // is retried by recurrence instead.
    let sink = KafkaSink::connect(&config.brokers, &config.topic, zone)?;
    info!(topic = %config.topic, brokers = ?config.brokers, zone = %zone, "connected to Kafka");

    let mut daemon = Daemon::new(config, stations);
    daemon.run(&source, &sink);

    Ok(())
}
