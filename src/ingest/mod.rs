/// Station data retrieval.
///
/// One GET per station per cycle, bounded by the client's request
/// timeout, with no internal retry — a failed fetch is surfaced to the
/// daemon, which logs it and moves on to the next station. The
/// fixed-interval full rescan is the retry mechanism.

pub mod fixtures;
pub mod gios;

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Source of raw station payloads. The daemon only ever sees this
/// trait, so tests drive full cycles with scripted payloads.
pub trait ReadingSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Production source: blocking HTTP GET against the station endpoint.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl ReadingSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(response.text()?)
    }
}
