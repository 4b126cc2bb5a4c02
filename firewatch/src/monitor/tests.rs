//! End-to-end tests for Monitor.

use super::*;
use crate::error::Error;
use crate::frame::Frame;
use crate::hazard::HazardCategory;
use crate::test_utils::{RecordingOutput, SharedSource, frame_100};
use crate::timer::{Clock, ManualClock};

const CYCLE_MS: u64 = 66;

// =============================================================================
// Helpers
// =============================================================================

struct Rig {
    clock: ManualClock,
    source: SharedSource,
    output: RecordingOutput,
    monitor: Monitor<SharedSource>,
}

fn rig_with(config: MonitorConfig) -> Rig {
    let clock = ManualClock::new(0);
    let source = SharedSource::default();
    let output = RecordingOutput::default();
    let monitor = Monitor::new(
        source.clone(),
        Arc::new(clock.clone()),
        Box::new(output.clone()),
        &config,
    )
    .unwrap();

    Rig {
        clock,
        source,
        output,
        monitor,
    }
}

fn rig() -> Rig {
    rig_with(MonitorConfig::default())
}

impl Rig {
    /// Runs one cycle at the current time, then advances the clock one period.
    fn cycle(&mut self, frame: Option<Frame>) -> CycleOutcome {
        self.source.push(frame);
        let outcome = self.monitor.run_cycle();
        self.clock.advance(CYCLE_MS);
        outcome
    }

    fn detections_from(&mut self, frames: impl IntoIterator<Item = Option<Frame>>) -> usize {
        frames
            .into_iter()
            .map(|frame| match self.cycle(frame) {
                CycleOutcome::Analyzed { detections, .. } => detections.len(),
                CycleOutcome::Skipped => 0,
            })
            .sum()
    }
}

fn fire_frame() -> Option<Frame> {
    Some(frame_100(0.10, 0.0))
}

fn empty_scene() -> Option<Frame> {
    Some(frame_100(0.0, 0.0))
}

// =============================================================================
// Cycle mechanics
// =============================================================================

#[test]
fn missing_frame_skips_without_touching_state() {
    let mut rig = rig();
    rig.cycle(fire_frame());
    rig.cycle(fire_frame());

    assert_eq!(rig.cycle(None), CycleOutcome::Skipped);
    assert_eq!(rig.monitor.history().len(), 2);
    assert_eq!(rig.monitor.stats().frames_skipped, 1);

    // The streak survived the gap, so one more frame confirms.
    assert_eq!(rig.detections_from([fire_frame()]), 1);
}

#[test]
fn fire_is_confirmed_on_third_frame_and_raises_alarm() {
    let mut rig = rig();
    let mut live = rig.monitor.subscribe();

    assert_eq!(rig.detections_from([fire_frame(), fire_frame()]), 0);
    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Idle);

    let CycleOutcome::Analyzed { detections, .. } = rig.cycle(fire_frame()) else {
        panic!("frame should have been analyzed");
    };
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].category, HazardCategory::Fire);
    assert_eq!(detections[0].confidence_percent, 80);
    assert_eq!(detections[0].timestamp_ms, 2 * CYCLE_MS);

    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Active);
    assert_eq!(rig.monitor.detections().len(), 1);
    assert!(rig.output.tones() >= 1);

    let events = live.drain();
    let confidences = events
        .iter()
        .filter(|e| matches!(e, MonitorEvent::Confidence(_)))
        .count();
    let confirmed: Vec<&DetectionEvent> = events
        .iter()
        .filter_map(|e| match e {
            MonitorEvent::Detection(d) => Some(d),
            _ => None,
        })
        .collect();
    assert_eq!(confidences, 3);
    assert_eq!(confirmed, vec![&detections[0]]);
}

#[test]
fn alarm_records_unrounded_confidence() {
    let mut rig = rig();
    // 166 of 2500 samples: 0.0664 coverage scores 0.5312.
    let partial = || Some(frame_100(0.0664, 0.0));
    rig.detections_from([partial(), partial()]);

    let CycleOutcome::Analyzed { confidence, detections } = rig.cycle(partial()) else {
        panic!("frame should have been analyzed");
    };
    assert_eq!(detections[0].confidence_percent, 53);

    let alert = rig.monitor.alerts().current_alert().unwrap();
    assert_eq!(alert.confidence, confidence.fire_confidence);
    assert!((alert.confidence - 0.5312).abs() < 1e-4);
}

#[test]
fn static_gray_wall_never_alarms() {
    let mut rig = rig();
    let wall = || Some(frame_100(0.0, 0.4));

    assert_eq!(rig.detections_from((0..60).map(|_| wall())), 0);
    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Idle);
}

#[test]
fn billowing_smoke_is_confirmed() {
    let mut rig = rig();
    let frames: Vec<Option<Frame>> = (0..7)
        .map(|i| Some(frame_100(0.0, if i % 2 == 0 { 0.2 } else { 0.3 })))
        .collect();

    // Motion needs three frames of history, then five qualifying frames.
    assert_eq!(rig.detections_from(frames[..6].to_vec()), 0);
    assert_eq!(rig.detections_from(frames[6..].to_vec()), 1);

    let detection = rig.monitor.detections().latest().unwrap();
    assert_eq!(detection.category, HazardCategory::Smoke);
    assert_eq!(rig.monitor.alerts().current_alert().unwrap().category, HazardCategory::Smoke);
}

#[test]
fn sustained_fire_is_debounced() {
    let mut rig = rig();
    // About 12 seconds of fire.
    rig.detections_from((0..182).map(|_| fire_frame()));

    let stamps: Vec<u64> = rig
        .monitor
        .detections()
        .iter()
        .map(|d| d.timestamp_ms)
        .collect();
    assert_eq!(stamps.len(), 3);
    for pair in stamps.windows(2) {
        assert!(pair[1] - pair[0] >= 5000, "{stamps:?}");
    }
    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Active);
}

// =============================================================================
// Alert lifecycle through the monitor
// =============================================================================

#[test]
fn alarm_auto_stops_once_fire_is_gone() {
    let mut rig = rig();
    let mut alerts = rig.monitor.subscribe_alerts();
    rig.detections_from([fire_frame(), fire_frame(), fire_frame()]);
    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Active);

    // Fire confirmed at 132 ms; the scene is empty afterwards.
    while rig.clock.now_ms() < 10_132 {
        rig.cycle(empty_scene());
        assert_eq!(rig.monitor.alert_phase(), AlertPhase::Active);
    }
    rig.cycle(empty_scene());
    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Silenced);

    for _ in 0..50 {
        rig.cycle(empty_scene());
    }
    let auto_stops = alerts
        .drain()
        .into_iter()
        .filter(|e| *e == AlertEvent::AutoStopped)
        .count();
    assert_eq!(auto_stops, 1);
}

#[test]
fn silence_and_stop() {
    let mut rig = rig();
    rig.detections_from([fire_frame(), fire_frame(), fire_frame()]);

    rig.monitor.silence();
    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Silenced);

    rig.monitor.stop();
    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Idle);
    assert!(rig.monitor.history().is_empty());
    assert_eq!(rig.monitor.next_timer_deadline_ms(), None);
    assert_eq!(rig.monitor.detections().len(), 1, "log survives stop");
}

#[test]
fn rejected_triggers_are_counted() {
    let mut rig = rig();
    // Fire then smoke within the trigger cooldown.
    rig.detections_from([fire_frame(), fire_frame(), fire_frame()]);
    let frames: Vec<Option<Frame>> = (0..7)
        .map(|i| Some(frame_100(0.0, if i % 2 == 0 { 0.2 } else { 0.3 })))
        .collect();
    rig.detections_from(frames);

    let stats = rig.monitor.stats();
    assert_eq!(stats.detections_emitted, 2);
    assert_eq!(stats.triggers_rejected, 1);
    assert_eq!(stats.frames_analyzed, 10);
    assert_eq!(
        rig.monitor.alerts().current_alert().unwrap().category,
        HazardCategory::Fire
    );
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn sensitivity_setter_validates() {
    let mut rig = rig();

    assert!(matches!(
        rig.monitor.set_sensitivity(0),
        Err(Error::InvalidSensitivityLevel(0))
    ));
    assert_eq!(rig.monitor.sensitivity(), Sensitivity::Medium);

    rig.monitor.set_sensitivity(1).unwrap();
    assert_eq!(rig.monitor.profile(), &Sensitivity::Low.profile());
}

#[test]
fn low_sensitivity_ignores_small_fire() {
    let mut rig = rig_with(MonitorConfig {
        sensitivity_level: 1,
        ..Default::default()
    });

    // 6% coverage scores 0.48, below the low profile's 0.7.
    let small = || Some(frame_100(0.06, 0.0));
    assert_eq!(rig.detections_from((0..10).map(|_| small())), 0);

    rig.monitor.set_sensitivity(3).unwrap();
    assert_eq!(rig.detections_from((0..3).map(|_| small())), 1);
}

#[test]
fn config_toggles_reach_the_alarm() {
    let mut rig = rig_with(MonitorConfig {
        sound_enabled: false,
        flash_enabled: false,
        ..Default::default()
    });
    rig.detections_from([fire_frame(), fire_frame(), fire_frame()]);

    assert_eq!(rig.monitor.alert_phase(), AlertPhase::Active);
    assert!(rig.output.calls().is_empty());

    rig.monitor.set_sound_enabled(true);
    assert_eq!(rig.output.tones(), 1);
}

#[test]
fn invalid_config_is_rejected() {
    let config = MonitorConfig {
        sensitivity_level: 9,
        ..Default::default()
    };
    let result = Monitor::new(
        SharedSource::default(),
        Arc::new(ManualClock::new(0)),
        Box::new(RecordingOutput::default()),
        &config,
    );
    assert!(result.is_err());
}
