/// Shared data types for the fetch → validate → dedup → publish pipeline.

/// A candidate reading extracted from one station payload.
///
/// The observation time is kept verbatim as the upstream string
/// (`"YYYY-MM-DD HH:MM:SS"`, local time, no zone designator). Dedup
/// compares it by exact identity; it is only parsed into a real
/// timestamp at publish time.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub observed_at: String,
    pub value: f64,
}

/// A reading accepted as new, ready to hand to the downstream channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRecord {
    pub station: String,
    pub observed_at: String,
    pub value: f64,
}

/// Broker acknowledgment for one published reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryProof {
    pub partition: i32,
    pub offset: i64,
}

/// Renders a measurement as its shortest round-trip decimal string.
///
/// `Display` for `f64` produces the shortest decimal that parses back to
/// the identical bits and never switches to scientific notation, so
/// `0.1` stays `"0.1"` rather than picking up binary-float artifacts.
pub fn format_value(value: f64) -> String {
    value.to_string()
}
