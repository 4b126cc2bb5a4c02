use super::output::{AlarmOutput, BeepPattern};
use crate::hazard::HazardCategory;
use crate::timer::Timer;

pub const FLASH_PULSE_MS: u64 = 500;
pub const FLASH_GAP_MS: u64 = 100;

/// Light state at each flash edge and the wait before the following edge.
const FLASH_EDGES: [(bool, u64); 4] = [
    (true, FLASH_PULSE_MS),
    (false, FLASH_GAP_MS),
    (true, FLASH_PULSE_MS),
    (false, 0),
];

/// Next deadline after `deadline`, resynchronised to `now` when polling fell a
/// whole period behind.
fn next_deadline(deadline: u64, now_ms: u64, delay_ms: u64) -> u64 {
    if deadline + delay_ms > now_ms {
        deadline
    } else {
        now_ms
    }
}

/// Repeating beeps while the alarm sounds.
#[derive(Debug, Default)]
pub(crate) struct BeepCadence {
    pattern: Option<BeepPattern>,
    timer: Timer,
}

impl BeepCadence {
    pub fn start(&mut self, category: HazardCategory, now_ms: u64, output: &mut dyn AlarmOutput) {
        let pattern = BeepPattern::for_category(category);
        output.play_tone(pattern.tone());
        self.timer.arm(now_ms, pattern.period_ms());
        self.pattern = Some(pattern);
    }

    /// Stops the cadence and cuts the tone if one was running.
    pub fn stop(&mut self, output: &mut dyn AlarmOutput) {
        self.timer.cancel();
        if self.pattern.take().is_some() {
            output.stop_audio();
        }
    }

    pub fn is_running(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.timer.deadline_ms()
    }

    pub fn poll(&mut self, now_ms: u64, output: &mut dyn AlarmOutput) {
        let (Some(pattern), Some(deadline)) = (self.pattern, self.timer.deadline_ms()) else {
            return;
        };
        if !self.timer.fire_if_due(now_ms) {
            return;
        }

        output.play_tone(pattern.tone());
        let base = next_deadline(deadline, now_ms, pattern.period_ms());
        self.timer.arm(base, pattern.period_ms());
    }
}

/// Two-pulse visual flash, restarted on every accepted trigger.
#[derive(Debug, Default)]
pub(crate) struct FlashSequence {
    next_edge: usize,
    lit: bool,
    timer: Timer,
}

impl FlashSequence {
    pub fn start(&mut self, now_ms: u64, output: &mut dyn AlarmOutput) {
        let (lit, wait) = FLASH_EDGES[0];
        self.set(lit, output);
        self.next_edge = 1;
        self.timer.arm(now_ms, wait);
    }

    /// Ends the sequence, turning the light off if it is on.
    pub fn stop(&mut self, output: &mut dyn AlarmOutput) {
        self.timer.cancel();
        self.next_edge = FLASH_EDGES.len();
        if self.lit {
            self.set(false, output);
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.timer.deadline_ms()
    }

    /// Advances through due edges. With `enabled` false, pulses that have not
    /// started are dropped; a lit pulse still ends on time.
    pub fn poll(&mut self, now_ms: u64, enabled: bool, output: &mut dyn AlarmOutput) {
        let Some(deadline) = self.timer.deadline_ms() else {
            return;
        };
        if !self.timer.fire_if_due(now_ms) {
            return;
        }

        let (lit, wait) = FLASH_EDGES[self.next_edge];
        if lit && !enabled {
            self.next_edge = FLASH_EDGES.len();
            return;
        }

        self.set(lit, output);
        self.next_edge += 1;
        if self.next_edge < FLASH_EDGES.len() {
            self.timer.arm(next_deadline(deadline, now_ms, wait), wait);
        }
    }

    fn set(&mut self, lit: bool, output: &mut dyn AlarmOutput) {
        self.lit = lit;
        output.set_flash(lit);
    }
}
