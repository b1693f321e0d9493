//! Recurring refresh trigger.
//!
//! The periodic refresh is an explicit scheduled trigger rather than ad-hoc
//! timer state: a background interval task sends ticks over a channel, the
//! control loop polls for them between frames, and the task's join handle is
//! aborted on shutdown. Missed ticks coalesce; the control loop sees at most
//! one pending trigger however long it was busy.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A periodic trigger polled from the control loop.
#[derive(Debug)]
pub struct RefreshSchedule {
    ticks: mpsc::Receiver<()>,
}

impl RefreshSchedule {
    /// Start a recurring trigger firing every `interval`.
    ///
    /// Must be called within a tokio runtime. Returns the schedule and the
    /// task's join handle; abort the handle to tear the trigger down.
    pub fn start(interval: Duration) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the initial fetch is
            // issued by the control loop itself, so swallow it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                // Capacity 1: an undrained tick simply coalesces
                let _ = tx.try_send(());
            }
        });

        (Self { ticks: rx }, handle)
    }

    /// Whether the trigger has fired since the last poll. Non-blocking.
    pub fn due(&mut self) -> bool {
        let mut fired = false;
        while self.ticks.try_recv().is_ok() {
            fired = true;
        }
        fired
    }
}
