/// Test fixtures: representative JSON payloads from the GIOS data API.
///
/// These reflect the real response shape of:
///   http://api.gios.gov.pl/pjp-api/rest/data/getData/{sensorId}
///
/// Response shape:
///   .key        — parameter key, e.g. "PM10"
///   .values[]   — measurement history, NEWEST FIRST
///     .date     — "YYYY-MM-DD HH:MM:SS" local time, or null
///     .value    — measurement as a number, or null
///
/// Note: while the upstream is mid-publication, `values[0]` routinely
/// carries null fields even though older entries are complete. Parsers
/// must treat that as a transient skip, not a failure.

/// Fully loaded payload: fresh entry at index 0, one older entry after.
#[cfg(test)]
pub(crate) fn fixture_complete_json() -> &'static str {
    r#"{
      "key": "PM10",
      "values": [
        { "date": "2024-05-01 10:00:00", "value": 12.3 },
        { "date": "2024-05-01 09:00:00", "value": 14.8 }
      ]
    }"#
}

/// Empty measurement history — a freshly registered or offline sensor.
#[cfg(test)]
pub(crate) fn fixture_empty_values_json() -> &'static str {
    r#"{ "key": "PM10", "values": [] }"#
}

/// No `values` field at all. The API serves this shape occasionally;
/// it must read as an empty history, not a decode failure.
#[cfg(test)]
pub(crate) fn fixture_missing_values_json() -> &'static str {
    r#"{ "key": "PM10" }"#
}

/// Timestamp not yet published for the latest slot.
#[cfg(test)]
pub(crate) fn fixture_null_date_json() -> &'static str {
    r#"{
      "key": "PM10",
      "values": [
        { "date": null, "value": 12.3 },
        { "date": "2024-05-01 09:00:00", "value": 14.8 }
      ]
    }"#
}

/// Measurement not yet published for the latest slot.
#[cfg(test)]
pub(crate) fn fixture_null_value_json() -> &'static str {
    r#"{
      "key": "PM10",
      "values": [
        { "date": "2024-05-01 10:00:00", "value": null },
        { "date": "2024-05-01 09:00:00", "value": 14.8 }
      ]
    }"#
}

/// Mid-publication payload: the latest slot exists but both fields are
/// still null.
#[cfg(test)]
pub(crate) fn fixture_partially_loaded_json() -> &'static str {
    r#"{
      "key": "PM10",
      "values": [
        { "date": null, "value": null },
        { "date": "2024-05-01 09:00:00", "value": 14.8 }
      ]
    }"#
}
