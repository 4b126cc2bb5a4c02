//! Alert lifecycle: trigger cooldown, alarm cadence, manual silence, and
//! automatic silence once the hazard has been gone for a while.
//!
//! ```text
//!            trigger                silence / auto-stop
//!   Idle ─────────────▶ Active ─────────────────────────▶ Silenced
//!    ▲                    ▲                                  │
//!    │                    └────────── trigger ───────────────┤
//!    └──────────────────────────── reset ────────────────────┘
//! ```
//!
//! All deferred work (beeps, flash edges, auto-stop) lives in [`Timer`]s that
//! fire only from [`AlertManager::poll`].

mod cadence;
mod output;


use std::sync::Arc;

use common::FloatExt;
use serde::Serialize;
use strum_macros::Display;
use tracing::{debug, info};

use crate::events::{EventBus, Subscription};
use crate::hazard::HazardCategory;
use crate::timer::{Clock, Timer};

use cadence::{BeepCadence, FlashSequence};

pub use cadence::{FLASH_GAP_MS, FLASH_PULSE_MS};
pub use output::{AlarmOutput, BeepPattern, NullOutput, Tone};

/// Minimum spacing between accepted triggers, across categories.
pub const TRIGGER_COOLDOWN_MS: u64 = 3000;
/// Hazard absence after which an active alarm silences itself.
pub const AUTO_STOP_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
pub enum AlertPhase {
    #[default]
    Idle,
    Active,
    Silenced,
}

/// The alert currently shown, active or silenced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveAlert {
    pub category: HazardCategory,
    pub confidence: f32,
    pub timestamp_ms: u64,
}

/// Snapshot of the lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertState {
    pub phase: AlertPhase,
    pub current_alert: Option<ActiveAlert>,
    pub last_trigger_ms: Option<u64>,
    pub last_hazard_seen_ms: Option<u64>,
    pub sound_enabled: bool,
    pub flash_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Accepted,
    /// Inside the cooldown window of the previous accepted trigger.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AlertEvent {
    PhaseChanged { from: AlertPhase, to: AlertPhase },
    Triggered { category: HazardCategory, confidence: f32 },
    TriggerRejected { category: HazardCategory },
    /// The alarm silenced itself after the hazard went away.
    AutoStopped,
}

/// Owner of the alert state machine and its timers.
#[derive(Debug)]
pub struct AlertManager {
    clock: Arc<dyn Clock>,
    output: Box<dyn AlarmOutput>,
    events: EventBus<AlertEvent>,

    phase: AlertPhase,
    current_alert: Option<ActiveAlert>,
    last_trigger_ms: Option<u64>,
    last_hazard_seen_ms: Option<u64>,
    sound_enabled: bool,
    flash_enabled: bool,

    auto_stop: Timer,
    beeps: BeepCadence,
    flash: FlashSequence,
}

impl AlertManager {
    pub fn new(clock: Arc<dyn Clock>, output: Box<dyn AlarmOutput>) -> Self {
        Self {
            clock,
            output,
            events: EventBus::new(),
            phase: AlertPhase::Idle,
            current_alert: None,
            last_trigger_ms: None,
            last_hazard_seen_ms: None,
            sound_enabled: true,
            flash_enabled: true,
            auto_stop: Timer::default(),
            beeps: BeepCadence::default(),
            flash: FlashSequence::default(),
        }
    }

    pub fn subscribe(&mut self) -> Subscription<AlertEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> AlertPhase {
        self.phase
    }

    pub fn current_alert(&self) -> Option<&ActiveAlert> {
        self.current_alert.as_ref()
    }

    pub fn is_sounding(&self) -> bool {
        self.beeps.is_running()
    }

    pub fn is_flash_lit(&self) -> bool {
        self.flash.is_lit()
    }

    pub fn is_auto_stop_pending(&self) -> bool {
        self.auto_stop.is_pending()
    }

    pub fn state(&self) -> AlertState {
        AlertState {
            phase: self.phase,
            current_alert: self.current_alert,
            last_trigger_ms: self.last_trigger_ms,
            last_hazard_seen_ms: self.last_hazard_seen_ms,
            sound_enabled: self.sound_enabled,
            flash_enabled: self.flash_enabled,
        }
    }

    /// Earliest pending timer deadline, for sleeping between cycles.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        [
            self.auto_stop.deadline_ms(),
            self.beeps.deadline_ms(),
            self.flash.deadline_ms(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Raises an alarm unless another trigger was accepted less than
    /// [`TRIGGER_COOLDOWN_MS`] ago.
    pub fn trigger(&mut self, category: HazardCategory, confidence: f32) -> TriggerOutcome {
        let now = self.clock.now_ms();
        if let Some(last) = self.last_trigger_ms {
            let since_last = now.saturating_sub(last);
            if since_last < TRIGGER_COOLDOWN_MS {
                debug!(%category, since_last, "Trigger rejected during cooldown");
                self.events.publish(AlertEvent::TriggerRejected { category });
                return TriggerOutcome::Rejected;
            }
        }

        let confidence = confidence.clamp_unit();
        self.last_trigger_ms = Some(now);
        self.last_hazard_seen_ms = Some(now);
        self.auto_stop.cancel();
        self.current_alert = Some(ActiveAlert {
            category,
            confidence,
            timestamp_ms: now,
        });
        self.set_phase(AlertPhase::Active);

        if self.sound_enabled {
            self.beeps.start(category, now, self.output.as_mut());
        }
        if self.flash_enabled {
            self.flash.start(now, self.output.as_mut());
        }

        info!(%category, confidence, "Alarm triggered");
        self.events
            .publish(AlertEvent::Triggered { category, confidence });

        TriggerOutcome::Accepted
    }

    /// Called once per analysis cycle with whether a hazard is visible.
    pub fn update_hazard_status(&mut self, present: bool) {
        let now = self.clock.now_ms();

        if present {
            self.last_hazard_seen_ms = Some(now);
            if self.auto_stop.is_pending() {
                debug!("Hazard back in view, auto-stop cancelled");
                self.auto_stop.cancel();
            }
            return;
        }

        if self.phase != AlertPhase::Active || self.auto_stop.is_pending() {
            return;
        }

        let absent_for = now.saturating_sub(self.last_hazard_seen_ms.unwrap_or(now));
        let delay = AUTO_STOP_MS.saturating_sub(absent_for);
        debug!(delay, "Hazard gone, auto-stop armed");
        self.auto_stop.arm(now, delay);
    }

    /// Acknowledges the alarm. Does nothing when idle.
    pub fn silence(&mut self) {
        if self.phase == AlertPhase::Idle {
            return;
        }
        info!("Alarm silenced");
        self.enter_silenced();
    }

    /// Drops the alert entirely and cancels every timer.
    pub fn reset(&mut self) {
        self.auto_stop.cancel();
        self.beeps.stop(self.output.as_mut());
        self.flash.stop(self.output.as_mut());
        self.current_alert = None;
        self.last_hazard_seen_ms = None;
        self.set_phase(AlertPhase::Idle);
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn flash_enabled(&self) -> bool {
        self.flash_enabled
    }

    /// Muting cuts the tone at once without changing phase; unmuting an active
    /// alarm resumes its cadence.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.sound_enabled == enabled {
            return;
        }
        self.sound_enabled = enabled;

        if !enabled {
            self.beeps.stop(self.output.as_mut());
        } else if self.phase == AlertPhase::Active {
            if let Some(alert) = self.current_alert {
                let now = self.clock.now_ms();
                self.beeps.start(alert.category, now, self.output.as_mut());
            }
        }
    }

    /// Disabling only suppresses pulses that have not started yet.
    pub fn set_flash_enabled(&mut self, enabled: bool) {
        self.flash_enabled = enabled;
    }

    /// Fires every due timer. Call between cycles, never during one.
    pub fn poll(&mut self) {
        let now = self.clock.now_ms();

        if self.auto_stop.fire_if_due(now) && self.phase == AlertPhase::Active {
            info!("Hazard absent, alarm auto-stopped");
            self.enter_silenced();
            self.events.publish(AlertEvent::AutoStopped);
        }

        self.beeps.poll(now, self.output.as_mut());
        self.flash
            .poll(now, self.flash_enabled, self.output.as_mut());
    }

    fn enter_silenced(&mut self) {
        self.auto_stop.cancel();
        self.beeps.stop(self.output.as_mut());
        self.flash.stop(self.output.as_mut());
        self.set_phase(AlertPhase::Silenced);
    }

    fn set_phase(&mut self, phase: AlertPhase) {
        if self.phase == phase {
            return;
        }
        let from = std::mem::replace(&mut self.phase, phase);
        debug!(%from, to = %phase, "Alert phase changed");
        self.events.publish(AlertEvent::PhaseChanged { from, to: phase });
    }
}
