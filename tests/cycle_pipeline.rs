//! End-to-end cycle scenarios, driven through scripted sources and a
//! recording sink instead of live HTTP and Kafka.
//!
//! These cover the pipeline's contract: a reading is published if and
//! only if its observation timestamp differs from the last successfully
//! published one for that station, and no per-station failure disturbs
//! the rest of the cycle.

use std::cell::RefCell;
use std::collections::HashMap;

use aqmon_service::config::ServiceConfig;
use aqmon_service::daemon::Daemon;
use aqmon_service::ingest::{FetchError, ReadingSource};
use aqmon_service::model::{DeliveryProof, PublishRecord};
use aqmon_service::publish::{PublishError, ReadingSink};
use aqmon_service::stations::StationConfig;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Serves a fixed queue of responses per URL, one per fetch.
struct ScriptedSource {
    responses: RefCell<HashMap<String, Vec<Result<String, FetchError>>>>,
}

impl ScriptedSource {
    fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
        }
    }

    fn push(&mut self, url: &str, response: Result<&str, FetchError>) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push(response.map(str::to_string));
    }
}

impl ReadingSource for ScriptedSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut responses = self.responses.borrow_mut();
        let queue = responses
            .get_mut(url)
            .unwrap_or_else(|| panic!("unscripted fetch of {}", url));
        assert!(!queue.is_empty(), "queue exhausted for {}", url);
        queue.remove(0)
    }
}

/// Records every acknowledged publish; can reject the next N attempts.
#[derive(Default)]
struct RecordingSink {
    sent: RefCell<Vec<PublishRecord>>,
    reject_next: RefCell<usize>,
}

impl RecordingSink {
    fn reject_next_publishes(&self, n: usize) {
        *self.reject_next.borrow_mut() = n;
    }

    fn sent(&self) -> Vec<PublishRecord> {
        self.sent.borrow().clone()
    }
}

impl ReadingSink for RecordingSink {
    fn publish(&self, record: &PublishRecord) -> Result<DeliveryProof, PublishError> {
        {
            let mut reject = self.reject_next.borrow_mut();
            if *reject > 0 {
                *reject -= 1;
                return Err(PublishError::Delivery("simulated broker rejection".into()));
            }
        }
        let mut sent = self.sent.borrow_mut();
        sent.push(record.clone());
        Ok(DeliveryProof {
            partition: 0,
            offset: sent.len() as i64,
        })
    }
}

// ---------------------------------------------------------------------------
// Scenario plumbing
// ---------------------------------------------------------------------------

fn test_config() -> ServiceConfig {
    toml::from_str(
        r#"
        brokers = ["master:9092"]
        topic = "gios"
        time_zone = "Europe/Warsaw"
        "#,
    )
    .unwrap()
}

fn station(name: &str) -> StationConfig {
    toml::from_str(&format!(
        "name = \"{}\"\nurl = \"http://example.org/data/{}\"\n",
        name, name
    ))
    .unwrap()
}

fn daemon_for(stations: Vec<StationConfig>) -> Daemon {
    Daemon::new(test_config(), stations)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_station_a_three_cycle_scenario() {
    let a = station("A");
    let mut source = ScriptedSource::new();
    // Cycle 1 and 2: identical payload. Cycle 3: a fresh observation.
    source.push(&a.url, Ok(r#"{"values":[{"date":"2024-05-01 10:00:00","value":12.3}]}"#));
    source.push(&a.url, Ok(r#"{"values":[{"date":"2024-05-01 10:00:00","value":12.3}]}"#));
    source.push(&a.url, Ok(r#"{"values":[{"date":"2024-05-01 10:10:00","value":12.5}]}"#));

    let sink = RecordingSink::default();
    let mut daemon = daemon_for(vec![a]);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.published, 1);
    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].station, "A");
    assert_eq!(sent[0].value, 12.3);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.published, 0);
    assert_eq!(stats.unchanged, 1);
    assert_eq!(sink.sent().len(), 1, "unchanged payload must not republish");

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.published, 1);
    let sent = sink.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].observed_at, "2024-05-01 10:10:00");
    assert_eq!(sent[1].value, 12.5);
}

#[test]
fn test_null_fields_do_not_disturb_other_stations() {
    let a = station("A");
    let b = station("B");
    let mut source = ScriptedSource::new();
    source.push(&a.url, Ok(r#"{"values":[{"date":"2024-05-01 10:00:00","value":12.3}]}"#));
    source.push(&b.url, Ok(r#"{"values":[{"date":null,"value":null}]}"#));

    let sink = RecordingSink::default();
    let mut daemon = daemon_for(vec![a, b]);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.published, 1);
    assert_eq!(stats.incomplete, 1);
    assert_eq!(stats.failed, 0);

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].station, "A");
    assert!(daemon.dedup().last_published("B").is_none());
}

#[test]
fn test_empty_values_publishes_nothing_and_commits_nothing() {
    let a = station("A");
    let mut source = ScriptedSource::new();
    source.push(&a.url, Ok(r#"{"values":[]}"#));

    let sink = RecordingSink::default();
    let mut daemon = daemon_for(vec![a]);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.incomplete, 1);
    assert!(sink.sent().is_empty());
    assert!(daemon.dedup().last_published("A").is_none());
}

#[test]
fn test_publish_failure_leaves_dedup_unchanged() {
    let a = station("A");
    let payload = r#"{"values":[{"date":"2024-05-01 10:00:00","value":12.3}]}"#;
    let mut source = ScriptedSource::new();
    source.push(&a.url, Ok(payload));
    source.push(&a.url, Ok(payload));

    let sink = RecordingSink::default();
    sink.reject_next_publishes(1);
    let mut daemon = daemon_for(vec![a]);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.failed, 1);
    assert!(sink.sent().is_empty());
    assert!(
        daemon.dedup().last_published("A").is_none(),
        "a rejected publish must not advance dedup state"
    );

    // Same payload is re-offered and goes through on the next cycle.
    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.published, 1);
    assert_eq!(sink.sent().len(), 1);
    assert_eq!(
        daemon.dedup().last_published("A"),
        Some("2024-05-01 10:00:00")
    );
}

#[test]
fn test_fetch_failure_isolated_to_one_station() {
    let a = station("A");
    let b = station("B");
    let mut source = ScriptedSource::new();
    source.push(&a.url, Err(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)));
    source.push(&b.url, Ok(r#"{"values":[{"date":"2024-05-01 10:00:00","value":31.0}]}"#));

    let sink = RecordingSink::default();
    let mut daemon = daemon_for(vec![a, b]);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.published, 1);
    assert_eq!(sink.sent()[0].station, "B");
}

#[test]
fn test_malformed_body_isolated_to_one_station() {
    let a = station("A");
    let b = station("B");
    let mut source = ScriptedSource::new();
    source.push(&a.url, Ok("<html>502 Bad Gateway</html>"));
    source.push(&b.url, Ok(r#"{"values":[{"date":"2024-05-01 10:00:00","value":31.0}]}"#));

    let sink = RecordingSink::default();
    let mut daemon = daemon_for(vec![a, b]);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.published, 1);
}

#[test]
fn test_out_of_order_republish_flows_through() {
    let a = station("A");
    let mut source = ScriptedSource::new();
    source.push(&a.url, Ok(r#"{"values":[{"date":"2024-05-01 10:00:00","value":12.3}]}"#));
    // Upstream swaps back to an earlier entry at index 0.
    source.push(&a.url, Ok(r#"{"values":[{"date":"2024-05-01 09:00:00","value":14.8}]}"#));

    let sink = RecordingSink::default();
    let mut daemon = daemon_for(vec![a]);

    daemon.run_cycle(&source, &sink);
    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(
        stats.published, 1,
        "a differing timestamp is new even when chronologically earlier"
    );
    assert_eq!(sink.sent().len(), 2);
}

#[test]
fn test_only_latest_entry_consumed() {
    let a = station("A");
    let mut source = ScriptedSource::new();
    source.push(
        &a.url,
        Ok(r#"{"values":[
            {"date":"2024-05-01 10:00:00","value":12.3},
            {"date":"2024-05-01 09:00:00","value":14.8},
            {"date":"2024-05-01 08:00:00","value":16.1}
        ]}"#),
    );

    let sink = RecordingSink::default();
    let mut daemon = daemon_for(vec![a]);

    let stats = daemon.run_cycle(&source, &sink);
    assert_eq!(stats.published, 1);
    let sent = sink.sent();
    assert_eq!(sent.len(), 1, "history entries past index 0 must not publish");
    assert_eq!(sent[0].observed_at, "2024-05-01 10:00:00");
}
