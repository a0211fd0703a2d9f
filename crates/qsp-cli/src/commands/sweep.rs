//! Sweep command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

use qsp_core::{Estimate, PhaseSequence, WaitPolicy, expected_probability, sweep_with};

use super::common::{OutputFormat, connect, print_header, print_json, signal_values, spinner};

#[derive(Serialize)]
struct SweepRow {
    x: f64,
    expected: f64,
    #[serde(flatten)]
    estimate: Estimate,
}

/// Execute the sweep command.
pub async fn execute(
    config: Option<&Path>,
    phases: &PhaseSequence,
    xs: Option<Vec<f64>>,
    points: usize,
    shots: Option<u32>,
    target: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let xs = signal_values(xs, points)?;
    let workspace = connect(config)?;
    let backend = workspace.resolve(target)?;
    let shots = shots.unwrap_or(workspace.config().default_shots);
    let policy = WaitPolicy::from_config(workspace.config());

    let estimates = if format == OutputFormat::Table {
        print_header("Sweeping phases", phases);
        println!(
            "  {} points, {} shots each on {}",
            xs.len(),
            shots,
            style(backend.name()).yellow()
        );
        let progress = spinner(format!("Running {} jobs...", xs.len()))?;
        let outcome = sweep_with(backend.as_ref(), phases, &xs, shots, policy).await;
        progress.finish_and_clear();
        outcome?
    } else {
        sweep_with(backend.as_ref(), phases, &xs, shots, policy).await?
    };

    let rows: Vec<SweepRow> = xs
        .iter()
        .zip(estimates)
        .map(|(&x, estimate)| SweepRow {
            x,
            expected: expected_probability(phases, x),
            estimate,
        })
        .collect();

    if format == OutputFormat::Json {
        return print_json(&rows);
    }

    println!(
        "\n  {:>8}  {:>9}  {:>8}  {:>9}",
        "x", "P(0)", "±σ", "expected"
    );
    for row in &rows {
        let inside = (row.estimate.ci_low..=row.estimate.ci_high).contains(&row.expected);
        println!(
            "  {:>8.4}  {:>9.4}  {:>8.4}  {:>9.4}  {}",
            row.x,
            row.estimate.probability,
            row.estimate.std_error,
            row.expected,
            if inside {
                style("✓").green()
            } else {
                style("·").dim()
            }
        );
    }
    Ok(())
}
