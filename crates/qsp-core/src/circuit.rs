//! Single-qubit circuits realizing a QSP sequence.
//!
//! `S(φ)` is `Rz(−2φ)` and `W(x)` is `Rx(−2·acos x)`. Both match the matrix
//! factors exactly, global phase included. Gates run in reverse order of
//! the product: the rightmost factor `S(φ_d)` is applied first.

use qsp_ir::{Circuit, ParameterExpression, QubitId};
use tracing::debug;

use crate::error::QspResult;
use crate::phases::{PhaseSequence, Signal};

/// Name of the free symbol in template circuits.
pub const SIGNAL_SYMBOL: &str = "x";

/// Rx angle realizing `W(x)`. Fails outside `[-1, 1]`.
pub fn signal_angle(x: f64) -> QspResult<f64> {
    Ok(Signal::new(x)?.angle())
}

/// The signal angle `−2·acos(x)` as an expression in [`SIGNAL_SYMBOL`].
pub fn signal_angle_expression() -> ParameterExpression {
    ParameterExpression::constant(-2.0) * ParameterExpression::symbol(SIGNAL_SYMBOL).acos()
}

fn build(
    name: &str,
    phases: &PhaseSequence,
    angle: impl Fn() -> ParameterExpression,
) -> QspResult<Circuit> {
    let q = QubitId(0);
    let mut circuit = Circuit::with_size(name, 1, 0);
    let mut rev = phases.as_slice().iter().rev();
    if let Some(&last) = rev.next() {
        circuit.rz(-2.0 * last, q)?;
    }
    for &phi in rev {
        circuit.rx(angle(), q)?.rz(-2.0 * phi, q)?;
    }
    debug!(
        "Built '{}' with {} gates for degree {}",
        name,
        circuit.instructions().len(),
        phases.degree()
    );
    Ok(circuit)
}

/// Circuit whose unitary is `build_unitary(phases, x)`.
///
/// Rejects `x` outside `[-1, 1]` and non-finite `x`. No measurements are
/// added.
pub fn build_circuit(phases: &PhaseSequence, x: f64) -> QspResult<Circuit> {
    let theta = signal_angle(x)?;
    build(&format!("qsp_d{}", phases.degree()), phases, || {
        ParameterExpression::constant(theta)
    })
}

/// The same circuit with the signal angle left symbolic in `x`.
///
/// `build_template(phases)?.bind("x", x)` has the same unitary as
/// `build_circuit(phases, x)`.
pub fn build_template(phases: &PhaseSequence) -> QspResult<Circuit> {
    build(
        &format!("qsp_d{}_template", phases.degree()),
        phases,
        signal_angle_expression,
    )
}
