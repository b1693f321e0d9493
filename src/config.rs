//! Application configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `OXYWATCH_*` environment variables, then command-line flags (applied by
//! `main`). Value validation is presence checks only; the threshold and
//! patient ids are taken as configured.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Runtime settings for the monitoring console.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// URL template for the patient resource, with one `{}` placeholder for
    /// the patient id.
    pub base_url_template: String,
    /// Patient ids offered for selection.
    pub patients: Vec<u32>,
    /// Minimum acceptable SpO2 percentage.
    pub spo2_threshold: i32,
    /// Auto-refresh interval in seconds.
    pub refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url_template: "https://disp.yxl.ch/rpm/patients/{}".to_string(),
            patients: vec![1, 2, 3, 10, 42],
            spo2_threshold: 95,
            refresh_secs: 30,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file, and the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let default_patients: Vec<i64> = defaults.patients.iter().map(|&p| p as i64).collect();

        let mut builder = config::Config::builder()
            .set_default("base_url_template", defaults.base_url_template)?
            .set_default("patients", default_patients)?
            .set_default("spo2_threshold", defaults.spo2_threshold as i64)?
            .set_default("refresh_secs", defaults.refresh_secs as i64)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }

        builder =
            builder.add_source(config::Environment::with_prefix("OXYWATCH").try_parsing(true));

        let settings: Settings = builder
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Presence checks on the assembled settings.
    pub fn validate(&self) -> Result<()> {
        if self.patients.is_empty() {
            bail!("no patient ids configured");
        }
        if self.base_url_template.is_empty() {
            bail!("base_url_template must not be empty");
        }
        if self.refresh_secs == 0 {
            bail!("refresh_secs must be at least 1");
        }
        Ok(())
    }
}
