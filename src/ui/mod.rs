//! Terminal rendering using ratatui.
//!
//! - [`common`]: header bar, status bar, and help overlay
//! - [`readings`]: the SpO2 readings table with per-row annotations
//! - [`advice`]: the advice draft panel, gated on the current verdict
//! - [`theme`]: light/dark styling

pub mod advice;
pub mod common;
pub mod readings;
pub mod theme;

pub use theme::Theme;
