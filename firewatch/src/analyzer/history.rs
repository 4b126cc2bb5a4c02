use std::collections::VecDeque;

use serde::Serialize;

/// Number of recent frames kept for temporal features.
pub const HISTORY_CAPACITY: usize = 5;
/// Temporal features need at least this many frames.
pub const MIN_TEMPORAL_SAMPLES: usize = 3;

/// Fire-ratio change between adjacent frames that counts as flicker.
const FLICKER_DELTA: f32 = 0.01;
/// Smoke-ratio change between adjacent frames that counts as movement.
const MOTION_DELTA: f32 = 0.005;
/// Moving pairs needed before smoke is treated as billowing.
const MIN_MOTION_PAIRS: usize = 2;

/// Per-frame coverage kept for temporal smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameMetrics {
    pub fire_ratio: f32,
    pub smoke_ratio: f32,
    pub timestamp_ms: u64,
}

/// FIFO of the most recent [`FrameMetrics`], never longer than [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default)]
pub struct FrameHistory {
    entries: VecDeque<FrameMetrics>,
}

impl FrameHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    pub fn push(&mut self, metrics: FrameMetrics) {
        self.entries.push_back(metrics);
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FrameMetrics> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&FrameMetrics> {
        self.entries.back()
    }

    /// Share of adjacent frame pairs whose fire ratio changed by more than the
    /// flicker delta. Zero until enough frames are available.
    pub fn flicker(&self) -> f32 {
        if self.entries.len() < MIN_TEMPORAL_SAMPLES {
            return 0.0;
        }

        let changing = self.changing_pairs(|m| m.fire_ratio, FLICKER_DELTA);
        changing as f32 / (self.entries.len() - 1) as f32
    }

    /// Whether the smoke ratio has been varying frame to frame.
    pub fn has_smoke_motion(&self) -> bool {
        self.entries.len() >= MIN_TEMPORAL_SAMPLES
            && self.changing_pairs(|m| m.smoke_ratio, MOTION_DELTA) >= MIN_MOTION_PAIRS
    }

    fn changing_pairs<F>(&self, value: F, delta: f32) -> usize
    where
        F: Fn(&FrameMetrics) -> f32,
    {
        self.entries
            .iter()
            .zip(self.entries.iter().skip(1))
            .filter(|(prev, next)| (value(next) - value(prev)).abs() > delta)
            .count()
    }
}
