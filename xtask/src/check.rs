use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::{cargo, EMBEDDED_TARGET};

/// One `cargo` invocation in the check pipeline.
struct Step {
    label: &'static str,
    args: &'static [&'static str],
    /// Failure aborts the run; otherwise it is reported as a warning.
    required: bool,
}

const STEPS: &[Step] = &[
    Step {
        label: "platform (no_std)",
        args: &["check", "-p", "platform", "--target", EMBEDDED_TARGET],
        required: true,
    },
    Step {
        label: "control (no_std)",
        args: &["check", "-p", "control", "--target", EMBEDDED_TARGET],
        required: true,
    },
    Step {
        label: "control (no_std + defmt)",
        args: &[
            "check",
            "-p",
            "control",
            "--target",
            EMBEDDED_TARGET,
            "--features",
            "defmt",
        ],
        required: true,
    },
    Step {
        label: "simulator (host)",
        args: &["check", "-p", "simulator"],
        required: true,
    },
    Step {
        label: "clippy",
        args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        required: false,
    },
    Step {
        label: "formatting",
        args: &["fmt", "--all", "--check"],
        required: false,
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking workspace...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in STEPS {
        println!("{}", format!("  Checking {}...", step.label).cyan());
        let start = Instant::now();
        let output = cargo(step.args)?;

        if output.status.success() {
            println!(
                "{}",
                format!(
                    "  ✓ {} passed in {:.2}s",
                    step.label,
                    start.elapsed().as_secs_f64()
                )
                .green()
            );
        } else if step.required {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed", step.label);
        } else {
            eprintln!("{}", format!("  ⚠ {} reported issues", step.label).yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        }
        println!();
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
