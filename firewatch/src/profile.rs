//! User-selectable detection sensitivity.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::{Error, Result};

/// Sensitivity level, numbered 1 (low) to 3 (high) in settings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

/// Thresholds the confirmation stage applies on every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityProfile {
    /// Minimum fire confidence for a frame to count toward a fire streak.
    pub fire_threshold: f32,
    /// Minimum smoke confidence for a frame to count toward a smoke streak.
    pub smoke_threshold: f32,
    /// Minimum fraction of sampled pixels that must match the category.
    pub min_pixel_ratio: f32,
}

impl Sensitivity {
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            1 => Ok(Sensitivity::Low),
            2 => Ok(Sensitivity::Medium),
            3 => Ok(Sensitivity::High),
            _ => Err(Error::InvalidSensitivityLevel(level)),
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Sensitivity::Low => 1,
            Sensitivity::Medium => 2,
            Sensitivity::High => 3,
        }
    }

    pub fn profile(self) -> SensitivityProfile {
        match self {
            Sensitivity::Low => SensitivityProfile {
                fire_threshold: 0.7,
                smoke_threshold: 0.75,
                min_pixel_ratio: 0.05,
            },
            Sensitivity::Medium => SensitivityProfile {
                fire_threshold: 0.5,
                smoke_threshold: 0.6,
                min_pixel_ratio: 0.03,
            },
            Sensitivity::High => SensitivityProfile {
                fire_threshold: 0.35,
                smoke_threshold: 0.45,
                min_pixel_ratio: 0.02,
            },
        }
    }
}

impl TryFrom<u8> for Sensitivity {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        Sensitivity::from_level(level)
    }
}

impl From<Sensitivity> for u8 {
    fn from(sensitivity: Sensitivity) -> u8 {
        sensitivity.level()
    }
}

impl Default for SensitivityProfile {
    fn default() -> Self {
        Sensitivity::default().profile()
    }
}
