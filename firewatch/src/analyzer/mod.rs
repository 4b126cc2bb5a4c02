//! Frame analysis: pixel sampling, coverage ratios, and confidence scoring.
//!
//! # Algorithm Overview
//!
//! 1. **Sampling**: every 4th pixel of the flat RGBA buffer is classified.
//!
//! 2. **Coverage**: fire and smoke hits are divided by the number of samples.
//!
//! 3. **Scoring**: each ratio is floor-gated (2% fire, 5% smoke) and then
//!    scaled linearly (×8 fire, ×5 smoke), saturating at 1.
//!
//! 4. **Flicker**: when the fire ratio has been jumping between recent frames,
//!    fire confidence is boosted. Static red objects do not flicker.
//!
//! 5. **History**: this frame's ratios are appended to a 5-frame FIFO.
//!
//! 6. **Regions**: hits are bucketed into a 50 px grid for overlays.
//!
//! No detection decision is taken here; see [`crate::confirmation`].

mod clusters;
mod history;


use common::{BoolExt, FloatExt};
use serde::Serialize;

use crate::color;
use crate::frame::{CHANNELS, Frame};
use crate::hazard::HazardCategory;

pub use clusters::{CELL_SIZE, MAX_REGIONS, Region};
pub use history::{FrameHistory, FrameMetrics, HISTORY_CAPACITY};

use clusters::ClusterGrid;

/// Only every `SAMPLE_STRIDE`-th pixel is classified.
pub const SAMPLE_STRIDE: usize = 4;

const FIRE_RATIO_FLOOR: f32 = 0.02;
const FIRE_GAIN: f32 = 8.0;
const SMOKE_RATIO_FLOOR: f32 = 0.05;
const SMOKE_GAIN: f32 = 5.0;
/// Flicker share above which fire confidence is boosted.
const FLICKER_BOOST_MIN: f32 = 0.3;
const FLICKER_BOOST_GAIN: f32 = 0.5;

/// Per-frame scores, produced fresh each cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfidenceResult {
    pub fire_confidence: f32,
    pub smoke_confidence: f32,
    pub fire_pixel_ratio: f32,
    pub smoke_pixel_ratio: f32,
    pub fire_regions: Vec<Region>,
    pub smoke_regions: Vec<Region>,
}

impl ConfidenceResult {
    /// The larger of the two confidences.
    pub fn peak_confidence(&self) -> f32 {
        self.fire_confidence.max(self.smoke_confidence)
    }

    pub fn confidence(&self, category: HazardCategory) -> f32 {
        match category {
            HazardCategory::Fire => self.fire_confidence,
            HazardCategory::Smoke => self.smoke_confidence,
        }
    }
}

/// Floor-gated linear score.
pub fn coverage_score(ratio: f32, floor: f32, gain: f32) -> f32 {
    (ratio >= floor).then_else((ratio * gain).min(1.0), 0.0)
}

pub fn fire_score(fire_ratio: f32) -> f32 {
    coverage_score(fire_ratio, FIRE_RATIO_FLOOR, FIRE_GAIN)
}

pub fn smoke_score(smoke_ratio: f32) -> f32 {
    coverage_score(smoke_ratio, SMOKE_RATIO_FLOOR, SMOKE_GAIN)
}

/// Fire confidence after the flicker boost.
pub fn apply_flicker(fire_confidence: f32, flicker: f32) -> f32 {
    if flicker > FLICKER_BOOST_MIN {
        (fire_confidence * (1.0 + flicker * FLICKER_BOOST_GAIN)).clamp_unit()
    } else {
        fire_confidence
    }
}

/// Stateful analyzer owning the short frame history and the cluster grids.
#[derive(Debug, Default)]
pub struct FrameAnalyzer {
    history: FrameHistory,
    fire_grid: ClusterGrid,
    smoke_grid: ClusterGrid,
}

impl FrameAnalyzer {
    pub fn new() -> Self {
        Self {
            history: FrameHistory::new(),
            ..Default::default()
        }
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    /// Forget temporal state, as when detection is stopped.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Scores one frame and appends its coverage to the history.
    pub fn analyze(&mut self, frame: &Frame, now_ms: u64) -> ConfidenceResult {
        let width = frame.width();
        self.fire_grid.reset(width, frame.height());
        self.smoke_grid.reset(width, frame.height());

        let mut samples = 0usize;
        let mut fire_hits = 0usize;
        let mut smoke_hits = 0usize;

        let sampled = frame
            .pixels()
            .chunks_exact(CHANNELS)
            .step_by(SAMPLE_STRIDE)
            .enumerate();
        for (sample, px) in sampled {
            samples += 1;
            let (r, g, b) = (px[0], px[1], px[2]);
            let pixel = sample * SAMPLE_STRIDE;

            if color::is_fire_pixel(r, g, b) {
                fire_hits += 1;
                self.fire_grid.add(pixel % width, pixel / width);
            } else if color::is_smoke_pixel(color::rgb_to_hsl(r, g, b)) {
                smoke_hits += 1;
                self.smoke_grid.add(pixel % width, pixel / width);
            }
        }

        let (fire_ratio, smoke_ratio) = if samples == 0 {
            (0.0, 0.0)
        } else {
            (
                (fire_hits as f32 / samples as f32).clamp_unit(),
                (smoke_hits as f32 / samples as f32).clamp_unit(),
            )
        };

        let flicker = self.history.flicker();
        let fire_confidence = apply_flicker(fire_score(fire_ratio), flicker);
        let smoke_confidence = smoke_score(smoke_ratio);

        self.history.push(FrameMetrics {
            fire_ratio,
            smoke_ratio,
            timestamp_ms: now_ms,
        });

        tracing::trace!(
            fire_ratio,
            smoke_ratio,
            fire_confidence,
            smoke_confidence,
            flicker,
            "Frame analyzed"
        );

        ConfidenceResult {
            fire_confidence,
            smoke_confidence,
            fire_pixel_ratio: fire_ratio,
            smoke_pixel_ratio: smoke_ratio,
            fire_regions: self.fire_grid.regions(),
            smoke_regions: self.smoke_grid.regions(),
        }
    }
}
