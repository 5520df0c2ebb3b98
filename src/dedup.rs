/// Last-published-timestamp tracker.
///
/// Decides whether a station's candidate reading is new. State lives in
/// memory only and is owned by the daemon loop; a restart resets every
/// station to "no prior reading", which at worst republishes one reading
/// per station (the downstream topic is keyed and compacted by station,
/// so consumers are expected to handle replays idempotently).

use std::collections::HashMap;

/// Maps station name → observation timestamp of the last reading that
/// was confirmed published for that station.
#[derive(Debug, Default)]
pub struct DedupTracker {
    last_published: HashMap<String, String>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tracker with seeded entries. Used to construct a daemon
    /// in a known state for deterministic tests.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            last_published: entries.into_iter().collect(),
        }
    }

    /// Whether this observation timestamp differs from the last one
    /// successfully published for the station.
    ///
    /// Comparison is exact string identity, not chronological ordering:
    /// the upstream source occasionally republishes an older entry at
    /// index 0, and that is deliberately passed through as a new reading
    /// rather than silently suppressed.
    pub fn is_new(&self, station: &str, observed_at: &str) -> bool {
        match self.last_published.get(station) {
            Some(prev) => prev != observed_at,
            None => true,
        }
    }

    /// Records a confirmed publish. Must only be called after the
    /// downstream channel acknowledged the reading; a reading that
    /// failed anywhere in the pipeline stays "new" and is retried by
    /// the next cycle's full rescan.
    pub fn commit(&mut self, station: &str, observed_at: &str) {
        self.last_published
            .insert(station.to_string(), observed_at.to_string());
    }

    /// Last committed observation timestamp for a station, if any.
    pub fn last_published(&self, station: &str) -> Option<&str> {
        self.last_published.get(station).map(String::as_str)
    }
}
