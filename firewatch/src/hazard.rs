use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

common::id_type!(DetectionId);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HazardCategory {
    Fire,
    Smoke,
}

impl HazardCategory {
    pub const fn index(self) -> usize {
        match self {
            HazardCategory::Fire => 0,
            HazardCategory::Smoke => 1,
        }
    }
}

/// A confirmed, de-duplicated detection. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub id: DetectionId,
    pub category: HazardCategory,
    /// Confidence rounded to whole percent, `0..=100`.
    pub confidence_percent: u8,
    pub timestamp_ms: u64,
}

impl DetectionEvent {
    pub fn new(category: HazardCategory, confidence: f32, timestamp_ms: u64) -> Self {
        Self {
            id: DetectionId::unique(),
            category,
            confidence_percent: confidence_to_percent(confidence),
            timestamp_ms,
        }
    }

    /// Confidence back in `[0, 1]`.
    pub fn confidence(&self) -> f32 {
        self.confidence_percent as f32 / 100.0
    }
}

pub fn confidence_to_percent(confidence: f32) -> u8 {
    use common::FloatExt;

    (confidence.clamp_unit() * 100.0).round() as u8
}
