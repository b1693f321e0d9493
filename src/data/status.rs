//! Status evaluation over a set of readings.
//!
//! The evaluation is a pure function of the reading set and the configured
//! threshold. The threshold is an inclusive lower bound for normal: a reading
//! exactly at the threshold is fine.

use super::Reading;

/// Aggregate patient status derived from one fetch cycle's readings.
///
/// Derived, never persisted; recomputed from the current reading set on
/// demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusVerdict {
    /// No readings were available.
    Unknown,
    /// Every reading is at or above the threshold.
    Ok,
    /// At least one reading is below the threshold.
    Warning,
}

impl StatusVerdict {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusVerdict::Unknown => "?",
            StatusVerdict::Ok => "OK",
            StatusVerdict::Warning => "WARN",
        }
    }

    /// Returns the display label for this verdict.
    pub fn label(&self) -> &'static str {
        match self {
            StatusVerdict::Unknown => "Unknown",
            StatusVerdict::Ok => "OK",
            StatusVerdict::Warning => "Warning",
        }
    }

    /// Whether the advice-sending affordance should be enabled.
    ///
    /// Advice may only be sent while the latest verdict is `Warning`.
    pub fn allows_advice(&self) -> bool {
        matches!(self, StatusVerdict::Warning)
    }
}

/// Per-reading annotation for display rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingStatus {
    Normal,
    Low,
}

impl ReadingStatus {
    /// Returns the display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::Normal => "NORMAL",
            ReadingStatus::Low => "LOW",
        }
    }
}

/// Compute the aggregate verdict for a set of readings.
///
/// Empty input yields `Unknown`, never `Ok`. Otherwise the verdict is
/// `Warning` exactly when the lowest reading is below the threshold.
pub fn evaluate(readings: &[Reading], threshold: i32) -> StatusVerdict {
    match readings.iter().map(|r| r.spo2).min() {
        None => StatusVerdict::Unknown,
        Some(lowest) if lowest < threshold => StatusVerdict::Warning,
        Some(_) => StatusVerdict::Ok,
    }
}

/// Annotate a single reading against the threshold.
///
/// `Low` exactly when `spo2 < threshold`.
pub fn reading_status(reading: &Reading, threshold: i32) -> ReadingStatus {
    if reading.spo2 < threshold {
        ReadingStatus::Low
    } else {
        ReadingStatus::Normal
    }
}
