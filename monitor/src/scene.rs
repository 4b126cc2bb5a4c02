//! Synthetic camera: a looping script of quiet, burning and smoky stretches.

use firewatch::{CHANNELS, Frame, FrameSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

const BACKGROUND_RGB: [u8; 3] = [30, 70, 35];
const FLAME_RGB: [[u8; 3]; 3] = [[255, 80, 0], [255, 140, 20], [240, 60, 10]];

/// Frames in one full script loop.
const SCRIPT_LENGTH: u64 = 600;
/// Chance that the camera drops a frame.
const DROP_CHANCE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScenePhase {
    Quiet,
    Fire,
    Smoke,
}

impl ScenePhase {
    fn at(frame_index: u64) -> Self {
        match frame_index % SCRIPT_LENGTH {
            0..60 => ScenePhase::Quiet,
            60..240 => ScenePhase::Fire,
            240..400 => ScenePhase::Quiet,
            400..550 => ScenePhase::Smoke,
            _ => ScenePhase::Quiet,
        }
    }
}

#[derive(Debug)]
pub struct SyntheticScene {
    width: usize,
    height: usize,
    frame_index: u64,
    phase: ScenePhase,
    rng: StdRng,
}

impl SyntheticScene {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            frame_index: 0,
            phase: ScenePhase::Quiet,
            rng: StdRng::from_os_rng(),
        }
    }

    fn render(&mut self) -> Frame {
        let pixel_count = self.width * self.height;
        let mut pixels = Vec::with_capacity(pixel_count * CHANNELS);
        for _ in 0..pixel_count {
            pixels.extend_from_slice(&[BACKGROUND_RGB[0], BACKGROUND_RGB[1], BACKGROUND_RGB[2], 255]);
        }

        match self.phase {
            ScenePhase::Quiet => {}
            ScenePhase::Fire => {
                // Flames flicker: both size and color change every frame.
                let coverage = self.rng.random_range(0.05..0.16);
                let rgb = FLAME_RGB[self.rng.random_range(0..FLAME_RGB.len())];
                self.paint_blob(&mut pixels, coverage, rgb);
            }
            ScenePhase::Smoke => {
                let coverage = self.rng.random_range(0.12..0.35);
                let gray = self.rng.random_range(120..=170);
                self.paint_blob(&mut pixels, coverage, [gray, gray, gray]);
            }
        }

        match Frame::new(self.width, self.height, pixels) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "Rendered frame rejected");
                Frame::solid(self.width, self.height, BACKGROUND_RGB)
            }
        }
    }

    /// Fills a bottom-anchored, horizontally centered rectangle covering
    /// `coverage` of the frame.
    fn paint_blob(&self, pixels: &mut [u8], coverage: f32, rgb: [u8; 3]) {
        let blob_width = (self.width / 2).max(1);
        let area = (coverage * (self.width * self.height) as f32) as usize;
        let blob_height = (area / blob_width).min(self.height);
        let left = (self.width - blob_width) / 2;

        for y in self.height - blob_height..self.height {
            let row = y * self.width;
            for x in left..left + blob_width {
                let offset = (row + x) * CHANNELS;
                pixels[offset..offset + 3].copy_from_slice(&rgb);
            }
        }
    }
}

impl FrameSource for SyntheticScene {
    fn next_frame(&mut self) -> Option<Frame> {
        let phase = ScenePhase::at(self.frame_index);
        self.frame_index += 1;
        if phase != self.phase {
            debug!(?phase, "Scene changed");
            self.phase = phase;
        }

        if self.rng.random_bool(DROP_CHANCE) {
            return None;
        }
        Some(self.render())
    }
}
