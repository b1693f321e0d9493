//! Data models for patient SpO2 readings.
//!
//! This module holds the types that cross the gateway boundary and the pure
//! status evaluation applied to them.
//!
//! ## Submodules
//!
//! - [`reading`]: [`Reading`] and the wire payload types it is decoded from
//! - [`status`]: [`StatusVerdict`], [`ReadingStatus`], and the evaluation functions
//!
//! ## Data Flow
//!
//! ```text
//! MeasurementsPayload (raw JSON)
//!        │
//!        ▼
//! Reading::from_wire()  per measurement, in server order
//!        │
//!        ▼
//! evaluate(&readings, threshold) ──▶ StatusVerdict
//! reading_status(&reading, threshold) ──▶ per-row annotation
//! ```

pub mod reading;
pub mod status;

pub use reading::{MeasurementsPayload, Reading, WireMeasurement};
pub use status::{evaluate, reading_status, ReadingStatus, StatusVerdict};
