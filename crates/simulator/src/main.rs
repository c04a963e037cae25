//! Desktop simulator for the panel controls.
//!
//! Replays a gesture scenario (or the built-in demo) through the real
//! `ControlPoller`, with a scripted GPIO bank standing in for hardware,
//! and logs every event that reaches the consumer.
//!
//! ```text
//! cargo run -p simulator -- --trace crates/simulator/scenarios/demo.json --debounce-ticks 2
//! RUST_LOG=debug cargo run -p simulator -- --encoder-type half --reversed
//! ```

// Desktop crate: unwrap/expect acceptable, Debug formatting in logs is fine.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]
#![allow(missing_docs)]

mod scenario;
mod sim;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use control::{ControlConfig, EncoderType, PinAssignment, DEFAULT_DEBOUNCE_TICKS};
use embassy_time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncoderKind {
    /// One detent per quadrature cycle
    Full,
    /// One detent per half cycle
    Half,
    /// One detent per transition
    Quarter,
}

impl From<EncoderKind> for EncoderType {
    fn from(kind: EncoderKind) -> Self {
        match kind {
            EncoderKind::Full => Self::Full,
            EncoderKind::Half => Self::Half,
            EncoderKind::Quarter => Self::Quarter,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "Replay GPIO gestures through the panel control poller", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON scenario file; the built-in demo runs when omitted
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Mechanical encoder variant
    #[arg(long, value_enum, default_value_t = EncoderKind::Full)]
    encoder_type: EncoderKind,

    /// Flip encoder direction
    #[arg(long)]
    reversed: bool,

    /// Stable ticks before a button edge is reported
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_TICKS)]
    debounce_ticks: u8,

    /// Ticks a button must be held before it auto-repeats (enables repeat)
    #[arg(long, requires = "repeat_interval")]
    repeat_delay: Option<u16>,

    /// Ticks between auto-repeats
    #[arg(long, requires = "repeat_delay")]
    repeat_interval: Option<u16>,

    /// Pace ticks in real time, in milliseconds (0 = as fast as possible)
    #[arg(long, default_value_t = 0)]
    tick_ms: u64,
}

impl Cli {
    fn control_config(&self) -> ControlConfig {
        let config = ControlConfig::new(PinAssignment::simple_encoder())
            .encoder_type(self.encoder_type.into())
            .reversed(self.reversed)
            .debounce_ticks(self.debounce_ticks);
        match (self.repeat_delay, self.repeat_interval) {
            (Some(delay), Some(interval)) => config.repeat(delay, interval),
            _ => config.no_repeat(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.control_config();
    config.validate().context("invalid control configuration")?;

    let scenario = match &cli.trace {
        Some(path) => Scenario::load(path)?,
        None => {
            info!("no --trace given, running built-in demo");
            Scenario::demo()
        }
    };
    let trace = scenario.to_trace(&config);
    info!(
        samples = trace.len(),
        encoder_type = ?config.encoder_type,
        reversed = config.reversed,
        debounce_ticks = config.debounce_ticks,
        "replaying scenario"
    );

    let period = (cli.tick_ms > 0).then(|| Duration::from_millis(cli.tick_ms));
    let report = sim::simulate(&config, &trace, period).context("building poller")?;

    info!(
        events = report.events.len(),
        ticks = report.stats.ticks,
        read_errors = report.stats.read_errors,
        dropped_events = report.stats.dropped_events,
        "done"
    );
    Ok(())
}
