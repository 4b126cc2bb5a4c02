use firewatch::{AlarmOutput, Tone};
use tracing::{debug, info};

/// Alarm output that reports every signal through tracing.
#[derive(Debug, Default)]
pub struct LogOutput {
    flash_lit: bool,
}

impl AlarmOutput for LogOutput {
    fn play_tone(&mut self, tone: Tone) {
        info!(
            frequency_hz = tone.frequency_hz,
            duration_ms = tone.duration_ms,
            "BEEP"
        );
    }

    fn stop_audio(&mut self) {
        debug!("Audio stopped");
    }

    fn set_flash(&mut self, lit: bool) {
        if self.flash_lit != lit {
            debug!(lit, "Flash");
        }
        self.flash_lit = lit;
    }
}
