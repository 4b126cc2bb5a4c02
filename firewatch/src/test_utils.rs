//! Synthetic frames and scripted collaborators for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::alert::{AlarmOutput, Tone};
use crate::analyzer::SAMPLE_STRIDE;
use crate::frame::{CHANNELS, Frame, FrameSource};

pub const FIRE_RGB: [u8; 3] = [255, 80, 0];
pub const SMOKE_RGB: [u8; 3] = [128, 128, 128];
pub const BACKGROUND_RGB: [u8; 3] = [20, 80, 20];

/// Frame whose *sampled* pixels match fire and smoke in the given proportions.
///
/// The first fire-count sampled pixels are fire, the next smoke-count are smoke,
/// everything else is background.
pub fn coverage_frame(width: usize, height: usize, fire_ratio: f32, smoke_ratio: f32) -> Frame {
    let pixel_count = width * height;
    let samples = pixel_count.div_ceil(SAMPLE_STRIDE);
    let fire_count = (fire_ratio * samples as f32).round() as usize;
    let smoke_count = (smoke_ratio * samples as f32).round() as usize;

    let mut pixels = Vec::with_capacity(pixel_count * CHANNELS);
    for pixel in 0..pixel_count {
        let rgb = if pixel % SAMPLE_STRIDE != 0 {
            BACKGROUND_RGB
        } else {
            let sample = pixel / SAMPLE_STRIDE;
            if sample < fire_count {
                FIRE_RGB
            } else if sample < fire_count + smoke_count {
                SMOKE_RGB
            } else {
                BACKGROUND_RGB
            }
        };
        pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }

    Frame::new(width, height, pixels).unwrap()
}

/// 100x100 frame: 2500 samples, so ratios land on exact sample counts.
pub fn frame_100(fire_ratio: f32, smoke_ratio: f32) -> Frame {
    coverage_frame(100, 100, fire_ratio, smoke_ratio)
}

/// Source replaying a fixed script; `None` entries model missing frames.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Option<Frame>>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Option<Frame>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: Option<Frame>) {
        self.frames.push_back(frame);
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Option<Frame> {
        self.frames.pop_front().flatten()
    }
}

/// Source handle that tests keep feeding after handing it to a monitor.
#[derive(Debug, Clone, Default)]
pub struct SharedSource {
    inner: Arc<Mutex<ScriptedSource>>,
}

impl SharedSource {
    pub fn push(&self, frame: Option<Frame>) {
        self.inner.lock().push(frame);
    }
}

impl FrameSource for SharedSource {
    fn next_frame(&mut self) -> Option<Frame> {
        self.inner.lock().next_frame()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputCall {
    Tone(Tone),
    StopAudio,
    Flash(bool),
}

/// Alarm output that records every call; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    calls: Arc<Mutex<Vec<OutputCall>>>,
}

impl RecordingOutput {
    pub fn calls(&self) -> Vec<OutputCall> {
        self.calls.lock().clone()
    }

    pub fn take(&self) -> Vec<OutputCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    pub fn tones(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, OutputCall::Tone(_)))
            .count()
    }
}

impl AlarmOutput for RecordingOutput {
    fn play_tone(&mut self, tone: Tone) {
        self.calls.lock().push(OutputCall::Tone(tone));
    }

    fn stop_audio(&mut self) {
        self.calls.lock().push(OutputCall::StopAudio);
    }

    fn set_flash(&mut self, lit: bool) {
        self.calls.lock().push(OutputCall::Flash(lit));
    }
}
