// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;

use std::process::{Command, Output};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// Bare-metal target used to prove the library crates stay `no_std`.
pub const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Panel input development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// no_std builds, clippy and formatting
    Check,
    /// Run the test suites (unit, integration and doc tests)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}

/// Run `cargo <args>` and capture its output.
pub fn cargo(args: &[&str]) -> Result<Output> {
    Command::new(std::env::var("CARGO").unwrap_or_else(|_| "cargo".into()))
        .args(args)
        .output()
        .with_context(|| format!("failed to spawn `cargo {}`", args.join(" ")))
}
