/// aqmon_service: GIOS air-quality reading poller and Kafka producer.
///
/// Polls a fixed set of GIOS measurement endpoints on a fixed interval,
/// extracts the latest reading per station, and forwards readings that
/// have not been published yet to a Kafka topic keyed by station name.
///
/// # Module structure
///
/// ```text
/// aqmon_service
/// ├── model     — shared data types (Observation, PublishRecord, DeliveryProof)
/// ├── config    — service configuration loader (aqmon.toml)
/// ├── stations  — station registry: name → measurement endpoint (stations.toml)
/// ├── dedup     — last-published-timestamp tracker (new vs. already seen)
/// ├── publish   — ReadingSink trait + Kafka producer with fixed-zone
/// │               observation-time parsing
/// ├── daemon    — main poll loop (fetch → validate → dedup → publish → commit)
/// └── ingest
///     ├── mod      — ReadingSource trait + blocking HTTP fetcher
///     ├── gios     — GIOS data API JSON structures + latest-entry extraction
///     └── fixtures (test only) — representative API response payloads
/// ```

pub mod config;
pub mod daemon;
pub mod dedup;
pub mod ingest;
pub mod model;
pub mod publish;
pub mod stations;
