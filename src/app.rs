//! Application state and interaction logic.
//!
//! The control flow is linear: a trigger (manual refresh, periodic tick,
//! patient switch) issues one fetch; the fetch ends `Ready` or `Failed`.
//! Independently, while the verdict is `Warning`, the clinician may submit
//! advice, which ends `Sent` or `Failed`. Both paths go through the
//! [`GatewayWorker`]; results are applied here, on the control thread, so the
//! current reading set is always replaced whole and never merged.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::data::{evaluate, reading_status, Reading, ReadingStatus, StatusVerdict};
use crate::gateway::{GatewayWorker, Outcome};
use crate::ui::Theme;

/// Where the current fetch cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight.
    Fetching,
    /// The last fetch succeeded and its readings are displayed.
    Ready,
    /// The last fetch failed; any displayed readings are stale.
    Failed,
}

/// Where the current advice send stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Sending,
    Sent,
    Failed,
}

/// Rejections raised before any gateway call is made.
///
/// These are caller-misuse conditions checked locally; no network traffic
/// happens for a rejected submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("enter advice text before sending")]
    EmptyAdvice,
    #[error("advice can only be sent while status is Warning")]
    NotWarning,
    #[error("an advice send is already in flight")]
    SendInFlight,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub theme: Theme,

    /// Patient ids offered for selection. Non-empty; enforced at
    /// configuration load.
    pub patients: Vec<u32>,
    pub selected_patient: usize,
    pub threshold: i32,

    /// Readings from the latest successful fetch, in server order.
    pub readings: Vec<Reading>,
    /// Verdict derived from `readings`.
    pub verdict: StatusVerdict,
    pub fetch_phase: FetchPhase,
    /// Set when displayed readings predate a failed refresh.
    pub stale: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<Instant>,

    /// Advice draft. Preserved across send failures so the clinician never
    /// has to retype.
    pub advice_text: String,
    /// Whether keystrokes are currently captured into the advice draft.
    pub advice_active: bool,
    pub send_phase: SendPhase,

    worker: GatewayWorker,
    /// Sequence number of the fetch whose outcome we will accept. Older
    /// outcomes have been superseded and are dropped.
    pending_fetch: Option<u64>,
    status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App over a spawned gateway worker.
    pub fn new(worker: GatewayWorker, patients: Vec<u32>, threshold: i32) -> Self {
        Self {
            running: true,
            show_help: false,
            theme: Theme::auto_detect(),
            patients,
            selected_patient: 0,
            threshold,
            readings: Vec::new(),
            verdict: StatusVerdict::Unknown,
            fetch_phase: FetchPhase::Idle,
            stale: false,
            last_error: None,
            last_updated: None,
            advice_text: String::new(),
            advice_active: false,
            send_phase: SendPhase::Idle,
            worker,
            pending_fetch: None,
            status_message: None,
        }
    }

    /// The currently selected patient id.
    pub fn patient_id(&self) -> u32 {
        self.patients[self.selected_patient]
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set a temporary status message shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Request a refresh of the selected patient's readings.
    ///
    /// The manual key, the periodic tick, and the initial load all funnel
    /// into this one operation. A no-op while a fetch is already in flight.
    pub fn request_refresh(&mut self) {
        if self.fetch_phase == FetchPhase::Fetching {
            return;
        }
        self.issue_fetch();
    }

    /// Switch to the next patient in the configured list.
    pub fn select_next_patient(&mut self) {
        let next = (self.selected_patient + 1) % self.patients.len();
        self.switch_patient(next);
    }

    /// Switch to the previous patient in the configured list.
    pub fn select_prev_patient(&mut self) {
        let prev = (self.selected_patient + self.patients.len() - 1) % self.patients.len();
        self.switch_patient(prev);
    }

    /// Change patient context: clear the displayed set and fetch fresh.
    ///
    /// Unlike a manual refresh this supersedes any fetch still in flight;
    /// the stale result for the old patient will be dropped when it lands.
    fn switch_patient(&mut self, index: usize) {
        if index == self.selected_patient {
            return;
        }
        self.selected_patient = index;
        self.readings.clear();
        self.verdict = StatusVerdict::Unknown;
        self.stale = false;
        self.last_error = None;
        self.last_updated = None;
        self.advice_text.clear();
        self.advice_active = false;
        self.send_phase = SendPhase::Idle;
        self.issue_fetch();
    }

    fn issue_fetch(&mut self) {
        self.fetch_phase = FetchPhase::Fetching;
        self.pending_fetch = Some(self.worker.request_fetch(self.patient_id()));
    }

    /// Whether the advice affordance is currently usable.
    pub fn can_submit(&self) -> bool {
        self.verdict.allows_advice() && self.send_phase != SendPhase::Sending
    }

    /// Begin capturing keystrokes into the advice draft.
    ///
    /// Ignored unless the verdict currently allows advice.
    pub fn start_advice(&mut self) {
        if self.verdict.allows_advice() {
            self.advice_active = true;
        }
    }

    /// Stop capturing keystrokes; the draft is kept.
    pub fn cancel_advice(&mut self) {
        self.advice_active = false;
    }

    pub fn advice_push(&mut self, c: char) {
        self.advice_text.push(c);
    }

    pub fn advice_pop(&mut self) {
        self.advice_text.pop();
    }

    /// Submit the advice draft to the gateway.
    ///
    /// Misuse conditions (empty text, verdict not `Warning`, send already in
    /// flight) short-circuit here without any gateway call.
    pub fn submit_advice(&mut self) -> Result<(), SubmitError> {
        let text = self.advice_text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyAdvice);
        }
        if !self.verdict.allows_advice() {
            return Err(SubmitError::NotWarning);
        }
        if self.send_phase == SendPhase::Sending {
            return Err(SubmitError::SendInFlight);
        }

        let text = text.to_string();
        self.send_phase = SendPhase::Sending;
        self.advice_active = false;
        self.worker.request_send(self.patient_id(), text);
        Ok(())
    }

    /// Annotate a reading row against the configured threshold.
    pub fn row_status(&self, reading: &Reading) -> ReadingStatus {
        reading_status(reading, self.threshold)
    }

    /// Drain and apply all completed gateway outcomes.
    ///
    /// Called once per frame on the control thread.
    pub fn drain_outcomes(&mut self) {
        while let Some(outcome) = self.worker.poll_outcome() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Fetched { seq, result, .. } => {
                if self.pending_fetch != Some(seq) {
                    // Superseded by a newer request; only the latest wins
                    return;
                }
                self.pending_fetch = None;
                match result {
                    Ok(readings) => {
                        // Replace, don't merge
                        self.readings = readings;
                        self.verdict = evaluate(&self.readings, self.threshold);
                        self.fetch_phase = FetchPhase::Ready;
                        self.stale = false;
                        self.last_error = None;
                        self.last_updated = Some(Instant::now());
                        if !self.verdict.allows_advice() {
                            self.advice_active = false;
                        }
                    }
                    Err(e) => {
                        // Keep the previous set on screen, marked stale
                        self.fetch_phase = FetchPhase::Failed;
                        self.last_error = Some(e.to_string());
                        self.stale = self.last_updated.is_some();
                    }
                }
            }
            Outcome::AdviceSent { result, .. } => match result {
                Ok(ack) if ack.stored => {
                    self.send_phase = SendPhase::Sent;
                    self.advice_text.clear();
                    self.advice_active = false;
                    self.set_status_message("Advice delivered to patient".to_string());
                }
                Ok(_) => {
                    // Accepted but storage unconfirmed; keep the draft
                    self.send_phase = SendPhase::Sent;
                    self.set_status_message(
                        "Advice received but storage was not confirmed".to_string(),
                    );
                }
                Err(e) => {
                    // Draft stays intact so the clinician need not retype
                    self.send_phase = SendPhase::Failed;
                    self.set_status_message(format!("Send failed: {e}"));
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Acknowledgment, Command, GatewayError};
    use chrono::{TimeZone, Utc};
    use tokio::sync::mpsc;

    fn test_app() -> (App, mpsc::Receiver<Command>, mpsc::Sender<Outcome>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (out_tx, out_rx) = mpsc::channel(16);
        let worker = GatewayWorker::from_channels(cmd_tx, out_rx);
        (App::new(worker, vec![1, 2, 3, 10, 42], 95), cmd_rx, out_tx)
    }

    fn readings(values: &[i32]) -> Vec<Reading> {
        values
            .iter()
            .enumerate()
            .map(|(i, &spo2)| Reading {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 10, i as u32, 0).unwrap(),
                spo2,
            })
            .collect()
    }

    /// Issue a refresh and complete it with the given result.
    fn complete_fetch(
        app: &mut App,
        out_tx: &mpsc::Sender<Outcome>,
        result: Result<Vec<Reading>, GatewayError>,
    ) {
        app.request_refresh();
        let seq = app.pending_fetch.expect("fetch should be pending");
        out_tx
            .try_send(Outcome::Fetched { patient_id: app.patient_id(), seq, result })
            .unwrap();
        app.drain_outcomes();
    }

    #[test]
    fn test_ok_readings_disable_advice() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[98, 96, 99])));

        assert_eq!(app.verdict, StatusVerdict::Ok);
        assert_eq!(app.fetch_phase, FetchPhase::Ready);
        assert!(!app.can_submit());
    }

    #[test]
    fn test_warning_readings_enable_advice() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[98, 92, 99])));

        assert_eq!(app.verdict, StatusVerdict::Warning);
        assert!(app.can_submit());
        let statuses: Vec<ReadingStatus> =
            app.readings.iter().map(|r| app.row_status(r)).collect();
        assert_eq!(
            statuses,
            vec![ReadingStatus::Normal, ReadingStatus::Low, ReadingStatus::Normal]
        );
    }

    #[test]
    fn test_empty_readings_are_unknown() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(vec![]));

        assert_eq!(app.verdict, StatusVerdict::Unknown);
        assert!(!app.can_submit());
        app.start_advice();
        assert!(!app.advice_active, "advice input must stay gated");
    }

    #[test]
    fn test_empty_advice_rejected_without_gateway_call() {
        let (mut app, mut cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[92])));
        // Drain the fetch command so only a send would remain
        let _ = cmd_rx.try_recv();

        app.advice_text = "   ".to_string();
        assert_eq!(app.submit_advice(), Err(SubmitError::EmptyAdvice));
        assert!(cmd_rx.try_recv().is_err(), "no command should reach the worker");
    }

    #[test]
    fn test_advice_rejected_when_verdict_not_warning() {
        let (mut app, mut cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[98])));
        let _ = cmd_rx.try_recv();

        app.advice_text = "Rest and hydrate".to_string();
        assert_eq!(app.submit_advice(), Err(SubmitError::NotWarning));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_fetch_failure_keeps_prior_readings_marked_stale() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[98, 92])));
        assert!(!app.stale);

        complete_fetch(
            &mut app,
            &out_tx,
            Err(GatewayError::Transport("server returned 500".to_string())),
        );

        assert_eq!(app.fetch_phase, FetchPhase::Failed);
        assert_eq!(app.readings.len(), 2, "prior readings must remain displayed");
        assert_eq!(app.verdict, StatusVerdict::Warning);
        assert!(app.stale);
        assert!(app.last_error.as_deref().unwrap().contains("500"));
    }

    #[test]
    fn test_first_fetch_failure_is_not_stale() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(
            &mut app,
            &out_tx,
            Err(GatewayError::Transport("connection refused".to_string())),
        );

        assert_eq!(app.fetch_phase, FetchPhase::Failed);
        assert!(!app.stale, "nothing was displayed, nothing is stale");
    }

    #[test]
    fn test_successful_send_clears_draft() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[92])));

        app.advice_text = "Increase oxygen flow".to_string();
        app.submit_advice().unwrap();
        assert_eq!(app.send_phase, SendPhase::Sending);

        out_tx
            .try_send(Outcome::AdviceSent {
                patient_id: 1,
                result: Ok(Acknowledgment { stored: true }),
            })
            .unwrap();
        app.drain_outcomes();

        assert_eq!(app.send_phase, SendPhase::Sent);
        assert!(app.advice_text.is_empty());
    }

    #[test]
    fn test_unstored_ack_is_warning_not_error() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[92])));

        app.advice_text = "Increase oxygen flow".to_string();
        app.submit_advice().unwrap();
        out_tx
            .try_send(Outcome::AdviceSent {
                patient_id: 1,
                result: Ok(Acknowledgment { stored: false }),
            })
            .unwrap();
        app.drain_outcomes();

        assert_eq!(app.send_phase, SendPhase::Sent);
        assert_eq!(app.advice_text, "Increase oxygen flow");
        assert!(app.get_status_message().unwrap().contains("not confirmed"));
    }

    #[test]
    fn test_send_failure_preserves_draft() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[92])));

        app.advice_text = "Increase oxygen flow".to_string();
        app.submit_advice().unwrap();
        out_tx
            .try_send(Outcome::AdviceSent {
                patient_id: 1,
                result: Err(GatewayError::Transport("timeout".to_string())),
            })
            .unwrap();
        app.drain_outcomes();

        assert_eq!(app.send_phase, SendPhase::Failed);
        assert_eq!(app.advice_text, "Increase oxygen flow");
    }

    #[test]
    fn test_second_submit_blocked_while_sending() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[92])));

        app.advice_text = "Advice".to_string();
        app.submit_advice().unwrap();
        assert_eq!(app.submit_advice(), Err(SubmitError::SendInFlight));
    }

    #[test]
    fn test_superseded_fetch_result_is_dropped() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        app.request_refresh();
        let old_seq = app.pending_fetch.unwrap();

        // Patient switch supersedes the in-flight fetch
        app.select_next_patient();
        let new_seq = app.pending_fetch.unwrap();
        assert_ne!(old_seq, new_seq);

        // The late result for the old patient arrives and must be dropped
        out_tx
            .try_send(Outcome::Fetched {
                patient_id: 1,
                seq: old_seq,
                result: Ok(readings(&[92])),
            })
            .unwrap();
        app.drain_outcomes();
        assert!(app.readings.is_empty());
        assert_eq!(app.fetch_phase, FetchPhase::Fetching);

        out_tx
            .try_send(Outcome::Fetched {
                patient_id: 2,
                seq: new_seq,
                result: Ok(readings(&[98])),
            })
            .unwrap();
        app.drain_outcomes();
        assert_eq!(app.readings.len(), 1);
        assert_eq!(app.verdict, StatusVerdict::Ok);
    }

    #[test]
    fn test_patient_switch_clears_context() {
        let (mut app, _cmd_rx, out_tx) = test_app();
        complete_fetch(&mut app, &out_tx, Ok(readings(&[92])));
        app.advice_text = "old draft".to_string();

        app.select_next_patient();
        assert_eq!(app.patient_id(), 2);
        assert!(app.readings.is_empty());
        assert_eq!(app.verdict, StatusVerdict::Unknown);
        assert!(app.advice_text.is_empty());
        assert_eq!(app.fetch_phase, FetchPhase::Fetching);
    }

    #[test]
    fn test_refresh_is_noop_while_fetching() {
        let (mut app, mut cmd_rx, _out_tx) = test_app();
        app.request_refresh();
        app.request_refresh();

        assert!(cmd_rx.try_recv().is_ok());
        assert!(cmd_rx.try_recv().is_err(), "second refresh must not enqueue");
    }

    #[test]
    fn test_patient_selection_wraps() {
        let (mut app, _cmd_rx, _out_tx) = test_app();
        assert_eq!(app.patient_id(), 1);
        app.select_prev_patient();
        assert_eq!(app.patient_id(), 42);
        app.select_next_patient();
        assert_eq!(app.patient_id(), 1);
    }
}
