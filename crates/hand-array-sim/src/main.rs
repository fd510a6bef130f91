//! Headless hand-array session
//!
//! Runs a scripted collect, manipulate and place session against a floor
//! with a hole in it, logging what each hand does. Roughly half of the
//! projected array falls over the hole, so the placement commit is partial.
//!
//! Usage:
//!   hand-array-sim                          # defaults, as fast as possible
//!   hand-array-sim --realtime --items 8     # paced at --fps
//!   RUST_LOG=hand_array=trace hand-array-sim

mod cli;
mod scenario;
mod surfaces;

use std::time::Duration;

use anyhow::Context;
use hand_array::item::ItemLifecycle;
use hand_array::{Hand, HandArrayConfig, HandRig, InteractionMode, ModeObserver};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use scenario::Scenario;
use surfaces::{Floor, Rect};

/// Logs mode and role changes as the negotiator reports them
struct LogObserver;

impl ModeObserver for LogObserver {
    fn on_mode_changed(&mut self, previous: InteractionMode, current: InteractionMode) {
        info!(from = previous.name(), to = current.name(), "mode changed");
    }

    fn on_dual_manipulation_started(&mut self, primary: Hand) {
        info!(primary = primary.name(), "two-hand manipulation started");
    }

    fn on_dual_manipulation_ended(&mut self, primary: Hand) {
        info!(primary = primary.name(), "two-hand manipulation ended");
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<HandArrayConfig> {
    let mut config = match &cli.config {
        Some(path) => HandArrayConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => HandArrayConfig::default(),
    };
    if let Some(layout) = cli.layout {
        config.layout.kind = layout.into();
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .init();

    let config = load_config(&cli)?;
    let fps = cli.fps.max(1);
    let frames = (cli.seconds.max(0.0) * fps as f32).ceil() as u64;
    let dt = Duration::from_secs_f64(1.0 / f64::from(fps));

    let scenario = Scenario::new(cli.items, frames);
    let mut rig = HandRig::new(config, scenario.catalog());
    rig.add_observer(Box::new(LogObserver));

    let floor = Floor::flat(0.0).with_hole(Rect {
        min_x: 0.02,
        max_x: 10.0,
        min_z: -10.0,
        max_z: 10.0,
    });

    info!(items = cli.items, frames, fps, realtime = cli.realtime, "session starting");
    let mut pacer = cli.realtime.then(|| tokio::time::interval(dt));
    for frame in 0..frames {
        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }
        scenario.step(&mut rig, frame, dt, &floor);
    }

    let count = |state: ItemLifecycle| rig.catalog().iter().filter(|i| i.lifecycle == state).count();
    info!(
        placed = count(ItemLifecycle::Placed),
        placing = count(ItemLifecycle::Placing),
        held = count(ItemLifecycle::Held),
        free = count(ItemLifecycle::Free),
        fixed_ticks = rig.clock().fixed_ticks,
        "session finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use hand_array::LayoutKind;

    #[test]
    fn test_sample_config_is_the_default() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/hand-array.toml");
        let cli = Cli::try_parse_from(["hand-array-sim", "--config", path]).unwrap();
        assert_eq!(load_config(&cli).unwrap(), HandArrayConfig::default());
    }

    #[test]
    fn test_layout_flag_overrides_config() {
        let cli = Cli::try_parse_from(["hand-array-sim", "--layout", "linear"]).unwrap();
        assert_eq!(load_config(&cli).unwrap().layout.kind, LayoutKind::Linear);
    }

    #[test]
    fn test_missing_config_has_context() {
        let cli = Cli::try_parse_from(["hand-array-sim", "--config", "/nope/missing.toml"]).unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("loading config"));
    }
}
