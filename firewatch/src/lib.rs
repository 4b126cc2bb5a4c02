//! Firewatch - fire and smoke detection over live camera frames.
//!
//! Frames flow through four stages, each usable on its own:
//! - Color classification of individual pixels (HSL heuristics)
//! - Frame analysis into per-category confidence with flicker and clustering
//! - Temporal confirmation: streaks, motion checks and per-category debounce
//! - Alarm lifecycle: beep cadence, flash pulses, cooldown and auto-stop
//!
//! [`Monitor`] wires the stages together behind a [`FrameSource`] and an
//! [`AlarmOutput`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use firewatch::{Monitor, MonitorConfig, NullOutput, SystemClock};
//!
//! let config = MonitorConfig::load("firewatch.yaml")?;
//! let mut monitor = Monitor::new(camera, Arc::new(SystemClock::new()), Box::new(NullOutput), &config)?;
//!
//! loop {
//!     monitor.run_cycle();
//!     std::thread::sleep(config.cycle_period());
//! }
//! ```

pub mod alert;
pub mod analyzer;
pub mod color;
pub mod config;
pub mod confirmation;
mod error;
pub mod events;
mod frame;
pub mod hazard;
pub mod monitor;
pub mod profile;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_utils;

// ============================================================================
// Frames and errors
// ============================================================================

pub use error::{Error, Result};
pub use frame::{CHANNELS, Frame, FrameSource};

// ============================================================================
// Detection
// ============================================================================

pub use analyzer::{ConfidenceResult, FrameAnalyzer, Region};
pub use confirmation::ConfirmationEngine;
pub use hazard::{DetectionEvent, DetectionId, HazardCategory};
pub use profile::{Sensitivity, SensitivityProfile};

// ============================================================================
// Alarm
// ============================================================================

pub use alert::{AlarmOutput, AlertEvent, AlertManager, AlertPhase, AlertState, NullOutput, Tone};
pub use timer::{Clock, ManualClock, SystemClock};

// ============================================================================
// Composition
// ============================================================================

pub use config::MonitorConfig;
pub use events::{EventBus, Subscription};
pub use monitor::{CycleOutcome, DetectionLog, Monitor, MonitorEvent, MonitorStats};
