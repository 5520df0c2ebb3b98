/// Downstream hand-off: Kafka producer for new readings.
///
/// One message per new reading, keyed by station name so the topic can
/// be partitioned and compacted per station. Delivery is synchronous
/// with full-ISR acknowledgment, the idempotent producer, and a single
/// in-flight request per connection, so an acknowledged reading is
/// durable and per-station ordering matches publish order.

use std::time::Duration;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use futures::executor;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use thiserror::Error;

use crate::model::{DeliveryProof, PublishRecord, format_value};

/// Upstream observation time format: local wall-clock, no zone designator.
pub const OBSERVATION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const METADATA_TIMEOUT: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum PublishError {
    /// The observation time did not parse in the configured zone. A
    /// publish-time error, distinct from payload validation: the reading
    /// stays uncommitted and is re-offered next cycle.
    #[error("observation time unusable: {0}")]
    Timestamp(String),

    /// The broker rejected the message or the send timed out.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Destination for new readings. The daemon only ever sees this trait,
/// so tests record publishes and simulate broker rejection.
pub trait ReadingSink {
    fn publish(&self, record: &PublishRecord) -> Result<DeliveryProof, PublishError>;
}

/// Parses an upstream observation time as wall-clock time in the
/// configured zone and converts it to epoch milliseconds.
///
/// The zone is threaded in from configuration rather than read from the
/// system: the upstream reports local time with no designator, and the
/// host running this service is not in that zone.
pub fn parse_observation_time(observed_at: &str, zone: Tz) -> Result<i64, PublishError> {
    let naive = NaiveDateTime::parse_from_str(observed_at, OBSERVATION_TIME_FORMAT)
        .map_err(|e| PublishError::Timestamp(format!("'{}': {}", observed_at, e)))?;

    // earliest() resolves the ambiguous hour at DST fall-back; a time
    // inside the spring-forward gap has no mapping and is an error.
    naive
        .and_local_timezone(zone)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| {
            PublishError::Timestamp(format!("'{}' does not exist in {}", observed_at, zone))
        })
}

/// Production sink: a process-lifetime Kafka producer.
pub struct KafkaSink {
    producer: FutureProducer,
    topic: String,
    zone: Tz,
}

impl KafkaSink {
    /// Builds the producer and verifies the cluster is reachable.
    ///
    /// librdkafka connects lazily, so a metadata fetch is issued here to
    /// make an unreachable cluster fail startup instead of the first
    /// cycle. Startup failure is fatal to the process by design.
    pub fn connect(brokers: &[String], topic: &str, zone: Tz) -> Result<Self, KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("max.in.flight.requests.per.connection", "1")
            .set("message.timeout.ms", "30000")
            .create()?;

        producer.client().fetch_metadata(Some(topic), METADATA_TIMEOUT)?;

        Ok(Self {
            producer,
            topic: topic.to_string(),
            zone,
        })
    }
}

impl ReadingSink for KafkaSink {
    fn publish(&self, record: &PublishRecord) -> Result<DeliveryProof, PublishError> {
        let timestamp = parse_observation_time(&record.observed_at, self.zone)?;
        let payload = format_value(record.value);

        let message = FutureRecord::to(&self.topic)
            .key(&record.station)
            .payload(&payload)
            .timestamp(timestamp);

        let (partition, offset) =
            executor::block_on(self.producer.send(message, Timeout::After(SEND_TIMEOUT)))
                .map_err(|(e, _)| PublishError::Delivery(e.to_string()))?;

        Ok(DeliveryProof { partition, offset })
    }
}
