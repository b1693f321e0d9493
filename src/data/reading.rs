//! Reading types and wire payload decoding.
//!
//! These types match the JSON format served by the remote patient API.
//! A reading set is rebuilt from scratch on every fetch; readings are never
//! merged across fetch cycles.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// A single timestamped SpO2 measurement.
///
/// Immutable once constructed. Owned by the set built for one fetch cycle;
/// there is no cross-request identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// When the measurement was taken.
    pub timestamp: DateTime<Utc>,
    /// Blood oxygen saturation percentage.
    ///
    /// Out-of-range values (negative, above 100) are kept as-is; the
    /// evaluator compares them arithmetically without clamping.
    pub spo2: i32,
}

impl Reading {
    /// Decode a wire measurement into a [`Reading`].
    ///
    /// Timestamps are ISO-8601. Both offset forms (`2024-03-01T10:00:00Z`,
    /// `2024-03-01T10:00:00+00:00`) and naive timestamps are accepted; naive
    /// timestamps are assumed to be UTC.
    pub fn from_wire(wire: &WireMeasurement) -> Result<Self, chrono::ParseError> {
        let timestamp = match DateTime::parse_from_rfc3339(&wire.timestamp) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(_) => NaiveDateTime::parse_from_str(&wire.timestamp, "%Y-%m-%dT%H:%M:%S%.f")?
                .and_utc(),
        };
        Ok(Self { timestamp, spo2: wire.spo2 })
    }
}

/// JSON body returned by `GET <base>/{patient_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementsPayload {
    /// Measurements in server response order. Order is preserved; no dedup,
    /// no sorting.
    pub measurements: Vec<WireMeasurement>,
}

/// One measurement as it appears on the wire.
///
/// Both fields are required; a measurement missing either one fails to
/// deserialize and the whole payload is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMeasurement {
    pub timestamp: String,
    pub spo2: i32,
}
