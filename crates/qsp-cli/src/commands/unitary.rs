//! Unitary command implementation.

use anyhow::Result;
use console::style;

use qsp_core::{PhaseSequence, build_circuit, build_unitary, expected_probability};

use super::common::{OutputFormat, print_header, print_json, print_unitary};

/// Execute the unitary command.
///
/// The circuit is only built for `x` in `[-1, 1]`; outside it the matrix
/// is still printed.
pub fn execute(phases: &PhaseSequence, x: f64, show_circuit: bool, format: OutputFormat) -> Result<()> {
    let u = build_unitary(phases, x);
    let probability = expected_probability(phases, x);
    let circuit = if show_circuit {
        Some(build_circuit(phases, x)?)
    } else {
        None
    };

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "phases": phases,
            "x": x,
            "unitary": u,
            "is_unitary": u.is_unitary(),
            "probability": probability,
            "circuit": circuit,
        }));
    }

    print_header("Unitary for phases", phases);
    println!("  x = {x}\n");
    print_unitary(&u);
    println!();
    println!(
        "  P(0) = |U[0,0]|² = {}",
        style(format!("{probability:.6}")).yellow()
    );
    if !u.is_unitary() {
        println!(
            "  {} |x| > 1: the product is not unitary",
            style("!").yellow().bold()
        );
    }

    if let Some(circuit) = circuit {
        println!("\n  Circuit ({} gates, applied top to bottom):", circuit.instructions().len());
        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                let params = gate
                    .kind
                    .parameters()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("    {}({}) q[0]", gate.name(), params);
            }
        }
    }
    Ok(())
}
