//! # oxywatch
//!
//! A clinician console for monitoring remote patient SpO2 readings.
//!
//! Readings are fetched from a remote HTTP API, evaluated against a
//! configured threshold, and displayed in a terminal UI. When any reading
//! falls below the threshold the patient status becomes `Warning` and the
//! clinician may send free-text advice back to the patient record.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Control loop                         │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐   ┌─────────┐  │
//! │  │   app   │───▶│   data   │───▶│   ui    │──▶│Terminal │  │
//! │  │ (state) │    │(evaluate)│    │(render) │   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘   └─────────┘  │
//! │       │                                                    │
//! │       ▼                                                    │
//! │  ┌─────────┐     worker task      ┌──────────────────┐     │
//! │  │ gateway │◀───(commands in,────▶│  remote HTTP API │     │
//! │  │         │     outcomes out)    └──────────────────┘     │
//! │  └─────────┘                                               │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: application state: fetch/send phases, verdict gating,
//!   staleness, and the advice draft
//! - **[`data`]**: [`Reading`] and the pure status evaluation
//!   ([`evaluate`], [`reading_status`])
//! - **[`gateway`]**: the [`PatientGateway`] trait, its HTTP implementation,
//!   and the background worker that keeps the control loop non-blocking
//! - **[`schedule`]**: the recurring refresh trigger
//! - **[`config`]**: layered settings (defaults, file, environment, CLI)
//! - **[`events`]** / **[`ui`]**: terminal input and rendering
//!
//! ## Status policy
//!
//! The verdict over one fetch cycle's readings is pure and total:
//!
//! ```
//! use oxywatch::data::{evaluate, StatusVerdict};
//!
//! assert_eq!(evaluate(&[], 95), StatusVerdict::Unknown);
//! ```
//!
//! A non-empty set is `Warning` exactly when its lowest reading is below the
//! threshold, else `Ok`. Advice may only be sent while the verdict is
//! `Warning`; that gate is enforced before the gateway is ever called.

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod gateway;
pub mod schedule;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{evaluate, reading_status, Reading, ReadingStatus, StatusVerdict};
pub use gateway::{Acknowledgment, GatewayError, GatewayWorker, HttpGateway, PatientGateway};
