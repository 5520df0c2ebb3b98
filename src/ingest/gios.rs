/// GIOS measurement data API client.
///
/// Handles JSON parsing for the per-station data endpoint:
///   http://api.gios.gov.pl/pjp-api/rest/data/getData/{sensorId}
///
/// The endpoint returns the recent measurement history for one sensor,
/// newest entry first. Only `values[0]` is ever consumed — the rest of
/// the history is this cycle's discard. See `fixtures.rs` for annotated
/// examples of the response structure, including the partially-loaded
/// shapes the API is known to serve.

use serde::Deserialize;
use thiserror::Error;

use crate::model::Observation;

// ---------------------------------------------------------------------------
// Serde structures for GIOS JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StationData {
    /// Sensor parameter key, e.g. "PM10". Informational only; the
    /// downstream message key is the configured station name.
    #[serde(default)]
    pub key: Option<String>,

    /// Measurement history, newest first. Either field of an entry may
    /// be null while the upstream is mid-publication.
    #[serde(default)]
    pub values: Vec<ValueEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ValueEntry {
    pub date: Option<String>,
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Latest-entry extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PayloadError {
    /// Body could not be decoded at all. Logged as an error — this shape
    /// is never expected from the API.
    #[error("payload decode failed: {0}")]
    Malformed(String),

    /// Body decoded but the latest entry is unusable this cycle. Logged
    /// as a warning — the API transiently serves null fields while new
    /// data is still loading, and the next cycle usually completes it.
    #[error("new data isn't fully loaded: {0}")]
    Incomplete(&'static str),
}

/// Extracts the latest observation from a station payload.
///
/// An empty (or absent) `values` sequence and null date/value fields are
/// all `Incomplete` — a skip for this cycle, never an index fault.
pub fn extract_latest(body: &str) -> Result<Observation, PayloadError> {
    let data: StationData =
        serde_json::from_str(body).map_err(|e| PayloadError::Malformed(e.to_string()))?;

    let latest = match data.values.first() {
        Some(entry) => entry,
        None => return Err(PayloadError::Incomplete("empty values sequence")),
    };

    match (&latest.date, latest.value) {
        (Some(date), Some(value)) => Ok(Observation {
            observed_at: date.clone(),
            value,
        }),
        (None, _) => Err(PayloadError::Incomplete("missing date")),
        (_, None) => Err(PayloadError::Incomplete("missing value")),
    }
}
