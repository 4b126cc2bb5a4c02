use std::fmt::Debug;

use serde::Serialize;

use crate::hazard::HazardCategory;

/// One beep request for the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

/// Audio and visual alarm hardware, as seen by the alert lifecycle.
pub trait AlarmOutput: Debug + Send {
    /// Starts a tone that ends by itself after `tone.duration_ms`.
    fn play_tone(&mut self, tone: Tone);
    /// Cuts any tone that is still sounding.
    fn stop_audio(&mut self);
    fn set_flash(&mut self, lit: bool);
}

/// Output that ignores every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl AlarmOutput for NullOutput {
    fn play_tone(&mut self, _tone: Tone) {}
    fn stop_audio(&mut self) {}
    fn set_flash(&mut self, _lit: bool) {}
}

/// Repeating beep pattern of an active alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeepPattern {
    pub frequency_hz: u32,
    pub on_ms: u64,
    pub gap_ms: u64,
}

impl BeepPattern {
    pub const FIRE: BeepPattern = BeepPattern {
        frequency_hz: 880,
        on_ms: 200,
        gap_ms: 100,
    };
    pub const SMOKE: BeepPattern = BeepPattern {
        frequency_hz: 660,
        on_ms: 300,
        gap_ms: 200,
    };

    pub const fn for_category(category: HazardCategory) -> BeepPattern {
        match category {
            HazardCategory::Fire => Self::FIRE,
            HazardCategory::Smoke => Self::SMOKE,
        }
    }

    pub const fn period_ms(&self) -> u64 {
        self.on_ms + self.gap_ms
    }

    pub const fn tone(&self) -> Tone {
        Tone {
            frequency_hz: self.frequency_hz,
            duration_ms: self.on_ms,
        }
    }
}
