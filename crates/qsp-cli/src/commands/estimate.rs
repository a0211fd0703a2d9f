//! Estimate command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use qsp_core::{
    PhaseSequence, WaitPolicy, build_circuit, estimate_probability_with, expected_probability,
};

use super::common::{connect, print_header, spinner};

/// Execute the estimate command.
pub async fn execute(
    config: Option<&Path>,
    phases: &PhaseSequence,
    x: f64,
    shots: Option<u32>,
    target: Option<&str>,
) -> Result<()> {
    let workspace = connect(config)?;
    let backend = workspace.resolve(target)?;
    let shots = shots.unwrap_or(workspace.config().default_shots);
    let circuit = build_circuit(phases, x)?;

    print_header("Estimating P(0) for phases", phases);
    println!(
        "  x = {x}, {} shots on {}",
        shots,
        style(backend.name()).yellow()
    );

    let progress = spinner(format!("Running on {}...", backend.name()))?;
    let policy = WaitPolicy::from_config(workspace.config());
    let outcome = estimate_probability_with(backend.as_ref(), &circuit, shots, policy).await;
    progress.finish_and_clear();
    let estimate = outcome?;

    let expected = expected_probability(phases, x);
    println!(
        "\n{} P(0) ≈ {} ± {:.4}  (95% CI [{:.4}, {:.4}])",
        style("✓").green().bold(),
        style(format!("{:.4}", estimate.probability)).yellow(),
        estimate.std_error,
        estimate.ci_low,
        estimate.ci_high
    );
    println!("  Zeros: {}/{}", estimate.zeros, estimate.shots);
    println!("  Expected |U[0,0]|²: {expected:.4}");
    Ok(())
}
