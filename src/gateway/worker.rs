//! Background worker bridging the async gateway to the control loop.
//!
//! The TUI runs on a single control thread and must never block on the
//! network. Operations are enqueued as [`Command`]s, executed one at a time
//! to completion by a single background task, and the results are marshaled
//! back as [`Outcome`]s which the control loop drains between frames.
//!
//! Fetches carry a sequence number so the control loop can drop results that
//! were superseded by a newer request; only the most recent fetch wins.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Acknowledgment, GatewayError, PatientGateway};
use crate::data::Reading;

/// A gateway operation requested by the control loop.
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch the current readings for a patient.
    Fetch { patient_id: u32, seq: u64 },
    /// Send advice text to a patient record.
    SendAdvice { patient_id: u32, text: String },
}

/// The result of a completed gateway operation.
#[derive(Debug)]
pub enum Outcome {
    /// A fetch finished, successfully or not.
    Fetched {
        patient_id: u32,
        seq: u64,
        result: Result<Vec<Reading>, GatewayError>,
    },
    /// An advice send finished, successfully or not.
    AdviceSent {
        patient_id: u32,
        result: Result<Acknowledgment, GatewayError>,
    },
}

/// Control-loop handle for enqueuing operations and collecting results.
#[derive(Debug)]
pub struct GatewayWorker {
    commands: mpsc::Sender<Command>,
    outcomes: mpsc::Receiver<Outcome>,
    next_seq: u64,
}

impl GatewayWorker {
    /// Spawn the worker task on the current tokio runtime.
    ///
    /// Returns the worker handle and the task's join handle; abort the task
    /// on shutdown.
    pub fn spawn(gateway: Arc<dyn PatientGateway>) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (outcome_tx, outcome_rx) = mpsc::channel(16);

        let handle = tokio::spawn(run(gateway, command_rx, outcome_tx));

        (
            Self {
                commands: command_tx,
                outcomes: outcome_rx,
                next_seq: 0,
            },
            handle,
        )
    }

    /// Worker over explicit channels, with no task behind it.
    ///
    /// Lets tests observe enqueued commands and inject outcomes directly.
    #[cfg(test)]
    pub(crate) fn from_channels(
        commands: mpsc::Sender<Command>,
        outcomes: mpsc::Receiver<Outcome>,
    ) -> Self {
        Self { commands, outcomes, next_seq: 0 }
    }

    /// Enqueue a fetch for a patient.
    ///
    /// Returns the sequence number identifying this request; an
    /// [`Outcome::Fetched`] with an older sequence number has been superseded.
    pub fn request_fetch(&mut self, patient_id: u32) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.enqueue(Command::Fetch { patient_id, seq });
        seq
    }

    /// Enqueue an advice send for a patient.
    pub fn request_send(&mut self, patient_id: u32, text: String) {
        self.enqueue(Command::SendAdvice { patient_id, text });
    }

    fn enqueue(&self, command: Command) {
        // The queue only backs up if the worker task is gone; nothing to do
        // then but note it.
        if let Err(e) = self.commands.try_send(command) {
            warn!("dropping gateway command: {e}");
        }
    }

    /// Non-blocking poll for the next completed outcome.
    pub fn poll_outcome(&mut self) -> Option<Outcome> {
        self.outcomes.try_recv().ok()
    }
}

/// Worker task body: one command at a time, run to completion, in order.
async fn run(
    gateway: Arc<dyn PatientGateway>,
    mut commands: mpsc::Receiver<Command>,
    outcomes: mpsc::Sender<Outcome>,
) {
    while let Some(command) = commands.recv().await {
        let outcome = match command {
            Command::Fetch { patient_id, seq } => {
                debug!(patient_id, seq, "fetch started");
                let result = gateway.fetch(patient_id).await;
                Outcome::Fetched { patient_id, seq, result }
            }
            Command::SendAdvice { patient_id, text } => {
                debug!(patient_id, "advice send started");
                let result = gateway.send_advice(patient_id, &text).await;
                Outcome::AdviceSent { patient_id, result }
            }
        };

        if outcomes.send(outcome).await.is_err() {
            // Control loop dropped its receiver; shut down
            break;
        }
    }
}
