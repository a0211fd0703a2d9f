//! Verify command implementation.

use anyhow::Result;
use console::style;

use qsp_core::{PhaseSequence, QspError, verify};

use super::common::{print_header, signal_values};

/// Execute the verify command.
pub fn execute(
    phases: &PhaseSequence,
    xs: Option<Vec<f64>>,
    points: usize,
    tolerance: f64,
) -> Result<()> {
    let xs = signal_values(xs, points)?;
    print_header("Verifying phases", phases);
    println!("  Tolerance: {tolerance:e}\n");
    println!("  {:>10}  {:>12}  {:>12}", "x", "circuit", "symbolic");

    let mut failures = 0usize;
    for &x in &xs {
        match verify(phases, x, tolerance) {
            Ok(v) => println!(
                "  {:>10.4}  {:>12.3e}  {:>12.3e}  {}",
                x,
                v.circuit_deviation,
                v.symbolic_deviation,
                style("✓").green()
            ),
            Err(QspError::NumericalMismatch { deviation, .. }) => {
                failures += 1;
                println!(
                    "  {:>10.4}  {:>12.3e}  {:>12}  {}",
                    x,
                    deviation,
                    "",
                    style("✗").red()
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    if failures > 0 {
        anyhow::bail!("{failures} of {} points exceed tolerance {tolerance:e}", xs.len());
    }
    println!(
        "{} All {} points agree within {:e}",
        style("✓").green().bold(),
        xs.len(),
        tolerance
    );
    Ok(())
}
