//! Temporal confirmation: turns the per-frame confidence stream into discrete,
//! de-duplicated [`DetectionEvent`]s.
//!
//! A category must qualify on several frames before it is reported. A frame that
//! fails to qualify takes one step back off the streak instead of wiping it.
//! Smoke additionally needs frame-to-frame movement and a longer streak,
//! because static gray surfaces are everywhere.


use strum::EnumCount;
use tracing::debug;

use crate::analyzer::{ConfidenceResult, FrameHistory};
use crate::hazard::{DetectionEvent, HazardCategory};
use crate::profile::SensitivityProfile;

/// Qualifying frames needed to confirm fire.
pub const FIRE_STREAK: u32 = 3;
/// Qualifying frames needed to confirm smoke.
pub const SMOKE_STREAK: u32 = FIRE_STREAK + 2;
/// Same-category detections closer than this are suppressed.
pub const DEBOUNCE_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastDetection {
    category: HazardCategory,
    timestamp_ms: u64,
}

/// Per-category streak counters plus the debounce memory.
#[derive(Debug, Default)]
pub struct ConfirmationEngine {
    streaks: [u32; HazardCategory::COUNT],
    last_detection: Option<LastDetection>,
}

impl ConfirmationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streak(&self, category: HazardCategory) -> u32 {
        self.streaks[category.index()]
    }

    pub fn reset(&mut self) {
        self.streaks = [0; HazardCategory::COUNT];
        self.last_detection = None;
    }

    /// Feeds one analyzed frame. `history` must already include that frame.
    ///
    /// Returns the events confirmed on this cycle, fire first.
    pub fn observe(
        &mut self,
        result: &ConfidenceResult,
        history: &FrameHistory,
        profile: &SensitivityProfile,
        now_ms: u64,
    ) -> Vec<DetectionEvent> {
        let fire_qualifies = result.fire_confidence >= profile.fire_threshold
            && result.fire_pixel_ratio >= profile.min_pixel_ratio;
        let smoke_qualifies = result.smoke_confidence >= profile.smoke_threshold
            && result.smoke_pixel_ratio >= profile.min_pixel_ratio
            && history.has_smoke_motion();

        [
            (HazardCategory::Fire, fire_qualifies, result.fire_confidence),
            (HazardCategory::Smoke, smoke_qualifies, result.smoke_confidence),
        ]
        .into_iter()
        .filter_map(|(category, qualifies, confidence)| {
            self.advance(category, qualifies, confidence, now_ms)
        })
        .collect()
    }

    fn advance(
        &mut self,
        category: HazardCategory,
        qualifies: bool,
        confidence: f32,
        now_ms: u64,
    ) -> Option<DetectionEvent> {
        let streak = &mut self.streaks[category.index()];
        if !qualifies {
            *streak = streak.saturating_sub(1);
            return None;
        }

        *streak += 1;
        if *streak < required_streak(category) {
            return None;
        }
        *streak = 0;

        if let Some(last) = self.last_detection {
            let elapsed = now_ms.saturating_sub(last.timestamp_ms);
            if last.category == category && elapsed < DEBOUNCE_MS {
                debug!(%category, elapsed, "Detection suppressed by debounce");
                return None;
            }
        }

        self.last_detection = Some(LastDetection {
            category,
            timestamp_ms: now_ms,
        });
        let event = DetectionEvent::new(category, confidence, now_ms);
        debug!(
            %category,
            confidence = event.confidence_percent,
            "Detection confirmed"
        );

        Some(event)
    }
}

pub const fn required_streak(category: HazardCategory) -> u32 {
    match category {
        HazardCategory::Fire => FIRE_STREAK,
        HazardCategory::Smoke => SMOKE_STREAK,
    }
}
