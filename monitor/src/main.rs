mod output;
mod scene;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::FileFormat;
use common::log_setup::{LogOptions, setup_logging};
use firewatch::{AlertEvent, Clock, Monitor, MonitorConfig, MonitorEvent, Subscription, SystemClock};
use tokio::time::MissedTickBehavior;
use tracing::{info, trace, warn};

use crate::output::LogOutput;
use crate::scene::SyntheticScene;

const SCENE_WIDTH: usize = 320;
const SCENE_HEIGHT: usize = 240;
const DEFAULT_LOG_LEVEL: &str = "info";
const PRINT_CONFIG_FLAG: &str = "--print-config";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1).as_deref() {
        Some(PRINT_CONFIG_FLAG) => {
            print!("{}", MonitorConfig::default().to_text(FileFormat::Yaml)?);
            return Ok(());
        }
        Some(path) => MonitorConfig::load(path),
        None => Ok(MonitorConfig::default()),
    };
    let log_level = config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |config| config.log_level.as_str())
        .to_string();
    setup_logging(&LogOptions::new(&log_level, "firewatch"))?;
    let config = config.inspect_err(|err| warn!(%err, "Config rejected"))?;
    info!(?config, "Starting firewatch monitor");

    let clock = Arc::new(SystemClock::new());
    let mut monitor = Monitor::new(
        SyntheticScene::new(SCENE_WIDTH, SCENE_HEIGHT),
        clock.clone(),
        Box::new(LogOutput::default()),
        &config,
    )?;
    let mut monitor_events = monitor.subscribe();
    let mut alert_events = monitor.subscribe_alerts();

    let mut ticker = tokio::time::interval(config.cycle_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let timer_wait = monitor
            .next_timer_deadline_ms()
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(clock.now_ms())));

        tokio::select! {
            _ = ticker.tick() => {
                monitor.run_cycle();
            }
            _ = tokio::time::sleep(timer_wait.unwrap_or_default()), if timer_wait.is_some() => {
                monitor.poll_timers();
            }
            result = &mut shutdown => {
                if let Err(err) = result {
                    warn!(%err, "Failed to listen for ctrl-c");
                }
                break;
            }
        }

        report(&mut monitor_events, &mut alert_events)?;
    }

    monitor.stop();
    report(&mut monitor_events, &mut alert_events)?;
    info!(
        stats = %serde_json::to_string(&monitor.stats())?,
        "Firewatch monitor stopped"
    );

    Ok(())
}

fn report(
    monitor_events: &mut Subscription<MonitorEvent>,
    alert_events: &mut Subscription<AlertEvent>,
) -> Result<()> {
    for event in monitor_events.drain() {
        match &event {
            MonitorEvent::Confidence(confidence) => {
                trace!(confidence = %serde_json::to_string(confidence)?, "Frame analyzed");
            }
            MonitorEvent::Detection(detection) => {
                info!(detection = %serde_json::to_string(detection)?, "Hazard detected");
            }
        }
    }

    for event in alert_events.drain() {
        info!(event = %serde_json::to_string(&event)?, "Alert");
    }

    Ok(())
}
