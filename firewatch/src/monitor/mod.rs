//! The detection cycle: frame source → analyzer → confirmation → alerts.
//!
//! [`Monitor`] owns every stateful stage and is driven by an external cadence
//! (about 15 cycles per second). Each call to [`Monitor::run_cycle`] first lets
//! due alarm timers fire, then processes at most one frame.

mod detection_log;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::alert::{AlarmOutput, AlertEvent, AlertManager, AlertPhase, TriggerOutcome};
use crate::analyzer::{ConfidenceResult, FrameAnalyzer, FrameHistory};
use crate::config::MonitorConfig;
use crate::confirmation::ConfirmationEngine;
use crate::error::Result;
use crate::events::{EventBus, Subscription};
use crate::frame::FrameSource;
use crate::hazard::DetectionEvent;
use crate::profile::{Sensitivity, SensitivityProfile};
use crate::timer::Clock;

pub use detection_log::DetectionLog;

/// Peak confidence above which the hazard counts as still in view.
pub const HAZARD_PRESENT_CONFIDENCE: f32 = 0.3;

/// Per-cycle output for live consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MonitorEvent {
    Confidence(ConfidenceResult),
    Detection(DetectionEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No frame was available; nothing advanced.
    Skipped,
    Analyzed {
        confidence: ConfidenceResult,
        detections: Vec<DetectionEvent>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub frames_analyzed: u64,
    pub frames_skipped: u64,
    pub detections_emitted: u64,
    pub triggers_rejected: u64,
}

#[derive(Debug)]
pub struct Monitor<S> {
    source: S,
    clock: Arc<dyn Clock>,
    sensitivity: Sensitivity,
    profile: SensitivityProfile,

    analyzer: FrameAnalyzer,
    confirmation: ConfirmationEngine,
    alerts: AlertManager,

    detections: DetectionLog,
    stats: MonitorStats,
    events: EventBus<MonitorEvent>,
}

impl<S: FrameSource> Monitor<S> {
    pub fn new(
        source: S,
        clock: Arc<dyn Clock>,
        output: Box<dyn AlarmOutput>,
        config: &MonitorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let sensitivity = config.sensitivity()?;

        let mut alerts = AlertManager::new(Arc::clone(&clock), output);
        alerts.set_sound_enabled(config.sound_enabled);
        alerts.set_flash_enabled(config.flash_enabled);

        Ok(Self {
            source,
            clock,
            sensitivity,
            profile: sensitivity.profile(),
            analyzer: FrameAnalyzer::new(),
            confirmation: ConfirmationEngine::new(),
            alerts,
            detections: DetectionLog::with_capacity(config.detection_log_capacity),
            stats: MonitorStats::default(),
            events: EventBus::new(),
        })
    }

    /// One detection cycle.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.alerts.poll();

        let Some(frame) = self.source.next_frame() else {
            self.stats.frames_skipped += 1;
            return CycleOutcome::Skipped;
        };

        let now = self.clock.now_ms();
        let confidence = self.analyzer.analyze(&frame, now);
        self.stats.frames_analyzed += 1;
        self.events
            .publish(MonitorEvent::Confidence(confidence.clone()));

        let detections =
            self.confirmation
                .observe(&confidence, self.analyzer.history(), &self.profile, now);

        for detection in &detections {
            self.stats.detections_emitted += 1;
            self.detections.push(detection.clone());
            self.events
                .publish(MonitorEvent::Detection(detection.clone()));

            let outcome = self.alerts.trigger(
                detection.category,
                confidence.confidence(detection.category),
            );
            if outcome == TriggerOutcome::Rejected {
                self.stats.triggers_rejected += 1;
            }
        }

        self.alerts
            .update_hazard_status(confidence.peak_confidence() > HAZARD_PRESENT_CONFIDENCE);

        CycleOutcome::Analyzed {
            confidence,
            detections,
        }
    }

    /// Lets due alarm timers fire without analysing a frame.
    pub fn poll_timers(&mut self) {
        self.alerts.poll();
    }

    /// Earliest alarm timer deadline, in clock milliseconds.
    pub fn next_timer_deadline_ms(&self) -> Option<u64> {
        self.alerts.next_deadline_ms()
    }

    pub fn subscribe(&mut self) -> Subscription<MonitorEvent> {
        self.events.subscribe()
    }

    pub fn subscribe_alerts(&mut self) -> Subscription<AlertEvent> {
        self.alerts.subscribe()
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn profile(&self) -> &SensitivityProfile {
        &self.profile
    }

    /// Takes effect on the next cycle.
    pub fn set_sensitivity(&mut self, level: u8) -> Result<()> {
        let sensitivity = Sensitivity::from_level(level)?;
        if sensitivity != self.sensitivity {
            info!(%sensitivity, "Sensitivity changed");
        }
        self.sensitivity = sensitivity;
        self.profile = sensitivity.profile();
        Ok(())
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.alerts.set_sound_enabled(enabled);
    }

    pub fn set_flash_enabled(&mut self, enabled: bool) {
        self.alerts.set_flash_enabled(enabled);
    }

    pub fn silence(&mut self) {
        self.alerts.silence();
    }

    /// Stops detection: the alarm resets and all temporal state is forgotten.
    /// The detection log is kept.
    pub fn stop(&mut self) {
        debug!("Detection stopped");
        self.alerts.reset();
        self.confirmation.reset();
        self.analyzer.reset();
    }

    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }

    pub fn alert_phase(&self) -> AlertPhase {
        self.alerts.phase()
    }

    pub fn history(&self) -> &FrameHistory {
        self.analyzer.history()
    }

    pub fn detections(&self) -> &DetectionLog {
        &self.detections
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
