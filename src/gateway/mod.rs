//! Gateway boundary to the remote patient API.
//!
//! This module provides a trait-based abstraction over the fetch/send
//! operations so the application can be driven by an HTTP backend in
//! production and by stubs in tests.
//!
//! The gateway has no notion of patient status; gating advice on the current
//! verdict is the caller's responsibility and is checked before any gateway
//! call is made.

mod http;
mod worker;

pub use http::HttpGateway;
pub use worker::{Command, GatewayWorker, Outcome};

use async_trait::async_trait;
use thiserror::Error;

use crate::data::Reading;

/// Errors surfaced by gateway operations.
///
/// Failures are surfaced to the caller immediately, once per call; there is
/// no internal retry.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Network failure or non-success HTTP status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The payload could not be parsed into readings.
    #[error("malformed payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Server acknowledgment for a sent advice message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment {
    /// Whether the server confirmed the message was stored.
    ///
    /// A reply lacking the `stored` field decodes as `false`; that is a
    /// non-fatal condition, not an error.
    pub stored: bool,
}

/// Fetch/send boundary to the remote patient resource.
///
/// Implementations perform one operation per call with no retries and no
/// timeout beyond the transport default.
#[async_trait]
pub trait PatientGateway: Send + Sync {
    /// Fetch the current readings for a patient, in server response order.
    async fn fetch(&self, patient_id: u32) -> Result<Vec<Reading>, GatewayError>;

    /// Send clinician advice text to a patient record.
    async fn send_advice(
        &self,
        patient_id: u32,
        text: &str,
    ) -> Result<Acknowledgment, GatewayError>;
}
