/// Core daemon implementation for the air-quality producer.
///
/// This module implements the main poll loop that:
/// 1. Fetches every configured station's measurement endpoint
/// 2. Validates the payload and extracts the latest observation
/// 3. Checks it against the last published timestamp per station
/// 4. Publishes new readings downstream, keyed by station
/// 5. Commits the dedup state only on acknowledged publishes
/// 6. Sleeps a fixed interval and rescans
///
/// Every per-station failure is contained within that station's pass;
/// a cycle always attempts all stations. There is no explicit retry or
/// backoff layer — the fixed-interval full rescan is the retry
/// mechanism, because a failed station's dedup entry never advanced.

use crate::config::ServiceConfig;
use crate::dedup::DedupTracker;
use crate::ingest::gios::{self, PayloadError};
use crate::ingest::ReadingSource;
use crate::model::PublishRecord;
use crate::publish::ReadingSink;
use crate::stations::StationConfig;
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// Cycle accounting
// ---------------------------------------------------------------------------

/// Per-cycle outcome counts, one increment per station.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// New readings acknowledged by the broker
    pub published: usize,

    /// Stations whose latest observation was already published
    pub unchanged: usize,

    /// Stations whose payload was transiently incomplete
    pub incomplete: usize,

    /// Fetch, decode, or publish failures
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

/// Main daemon state. Owns the dedup tracker exclusively; the loop is
/// single-threaded, so state mutations are serialized by construction.
pub struct Daemon {
    config: ServiceConfig,
    stations: Vec<StationConfig>,
    dedup: DedupTracker,
}

impl Daemon {
    pub fn new(config: ServiceConfig, stations: Vec<StationConfig>) -> Self {
        Self::with_dedup_state(config, stations, DedupTracker::new())
    }

    /// Builds a daemon with injected dedup state, for deterministic tests.
    pub fn with_dedup_state(
        config: ServiceConfig,
        stations: Vec<StationConfig>,
        dedup: DedupTracker,
    ) -> Self {
        Self {
            config,
            stations,
            dedup,
        }
    }

    pub fn dedup(&self) -> &DedupTracker {
        &self.dedup
    }

    /// Runs one full pass over all stations.
    ///
    /// Per station: fetch → validate → dedup check → publish → commit,
    /// where any stage's failure ends that station's pass without a
    /// commit and without disturbing the remaining stations.
    pub fn run_cycle(
        &mut self,
        source: &impl ReadingSource,
        sink: &impl ReadingSink,
    ) -> CycleStats {
        let mut stats = CycleStats::default();

        for station in &self.stations {
            let body = match source.fetch(&station.url) {
                Ok(body) => body,
                Err(e) => {
                    error!(station = %station.name, url = %station.url, error = %e, "fetch failed");
                    stats.failed += 1;
                    continue;
                }
            };

            let observation = match gios::extract_latest(&body) {
                Ok(observation) => observation,
                Err(e @ PayloadError::Malformed(_)) => {
                    error!(station = %station.name, url = %station.url, error = %e, "decode failed");
                    stats.failed += 1;
                    continue;
                }
                Err(e @ PayloadError::Incomplete(_)) => {
                    warn!(station = %station.name, "{}", e);
                    stats.incomplete += 1;
                    continue;
                }
            };

            if !self.dedup.is_new(&station.name, &observation.observed_at) {
                info!(
                    station = %station.name,
                    date = %observation.observed_at,
                    reading = observation.value,
                    "already have recent data"
                );
                stats.unchanged += 1;
                continue;
            }

            let record = PublishRecord {
                station: station.name.clone(),
                observed_at: observation.observed_at.clone(),
                value: observation.value,
            };

            match sink.publish(&record) {
                Ok(proof) => {
                    // Commit strictly after the broker acknowledged the
                    // message; an unacknowledged reading stays "new" for
                    // the next cycle.
                    self.dedup.commit(&station.name, &observation.observed_at);
                    info!(
                        station = %station.name,
                        date = %observation.observed_at,
                        reading = observation.value,
                        partition = proof.partition,
                        offset = proof.offset,
                        "transmitted new reading"
                    );
                    stats.published += 1;
                }
                Err(e) => {
                    error!(
                        station = %station.name,
                        date = %observation.observed_at,
                        error = %e,
                        "publish failed"
                    );
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    /// Main daemon loop (runs indefinitely).
    pub fn run(&mut self, source: &impl ReadingSource, sink: &impl ReadingSink) {
        info!(
            stations = self.stations.len(),
            interval_minutes = self.config.poll_interval_minutes,
            "starting poll loop"
        );

        loop {
            let stats = self.run_cycle(source, sink);
            info!(
                published = stats.published,
                unchanged = stats.unchanged,
                incomplete = stats.incomplete,
                failed = stats.failed,
                "cycle complete, will now wait"
            );

            std::thread::sleep(std::time::Duration::from_secs(
                self.config.poll_interval_minutes * 60,
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
