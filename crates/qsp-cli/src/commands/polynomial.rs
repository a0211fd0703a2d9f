//! Polynomial command implementation.

use anyhow::Result;
use console::style;

use qsp_core::{PhaseSequence, build_polynomial};

use super::common::{OutputFormat, print_header, print_json};

const ENTRY_NAMES: [&str; 4] = ["U[0,0]", "U[0,1]", "U[1,0]", "U[1,1]"];

/// Execute the polynomial command.
pub fn execute(phases: &PhaseSequence, format: OutputFormat) -> Result<()> {
    let matrix = build_polynomial(phases);

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "phases": phases,
            "degree": phases.degree(),
            "matrix": matrix,
        }));
    }

    print_header("Polynomial for phases", phases);
    println!("  Degree: {}\n", phases.degree());
    for (name, entry) in ENTRY_NAMES.iter().zip(&matrix.entries) {
        println!("  {} = p(x) + √(1-x²)·q(x)", style(name).cyan().bold());
        println!("    p(x) = {}", entry.p);
        println!("    q(x) = {}", entry.q);
        println!();
    }
    Ok(())
}
