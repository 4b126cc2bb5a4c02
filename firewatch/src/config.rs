//! Monitor settings, loadable from YAML, JSON, or TOML.

use std::path::Path;

use common::FileFormat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::Sensitivity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// 1 (low) to 3 (high).
    pub sensitivity_level: u8,
    pub sound_enabled: bool,
    pub flash_enabled: bool,
    /// Detection cycles per second.
    pub cycle_hz: f64,
    /// Confirmed detections kept in memory.
    pub detection_log_capacity: usize,
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sensitivity_level: Sensitivity::default().level(),
            sound_enabled: true,
            flash_enabled: true,
            cycle_hz: 15.0,
            detection_log_capacity: 50,
            log_level: "info".to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_file_name(path).map_err(|e| Error::ConfigLoad(e.into()))?;
        let bytes = std::fs::read(path).map_err(|e| Error::ConfigLoad(e.into()))?;
        Self::parse(&bytes, format)
    }

    pub fn parse(bytes: &[u8], format: FileFormat) -> Result<Self> {
        let config: MonitorConfig =
            common::serde::deserialize(bytes, format).map_err(Error::ConfigLoad)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the settings in `format`, e.g. to write a starter file.
    pub fn to_text(&self, format: FileFormat) -> Result<String> {
        common::serde::serialize(self, format).map_err(Error::ConfigLoad)
    }

    pub fn validate(&self) -> Result<()> {
        Sensitivity::from_level(self.sensitivity_level)?;
        if !(self.cycle_hz.is_finite() && self.cycle_hz > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "cycle_hz must be positive, got {}",
                self.cycle_hz
            )));
        }
        if self.detection_log_capacity == 0 {
            return Err(Error::InvalidConfig(
                "detection_log_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sensitivity(&self) -> Result<Sensitivity> {
        Sensitivity::from_level(self.sensitivity_level)
    }

    pub fn cycle_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.cycle_hz)
    }
}
