//! Cross-check of circuit, numeric product and symbolic product.

use qsp_ir::Unitary2x2;
use serde::Serialize;
use tracing::{debug, warn};

use crate::circuit::build_circuit;
use crate::error::{QspError, QspResult};
use crate::matrix::build_unitary;
use crate::phases::PhaseSequence;
use crate::polynomial::build_polynomial;

/// Default elementwise tolerance for [`verify`].
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// The three matrices compared by [`verify`] and their deviations.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    /// Signal value checked.
    pub x: f64,
    /// Unitary of the built circuit.
    pub circuit: Unitary2x2,
    /// Numeric matrix product.
    pub numeric: Unitary2x2,
    /// Symbolic product evaluated at `x`.
    pub symbolic: Unitary2x2,
    /// Largest deviation of the circuit from the numeric product.
    pub circuit_deviation: f64,
    /// Largest deviation of the symbolic product from the numeric product.
    pub symbolic_deviation: f64,
    /// Tolerance the deviations passed.
    pub tolerance: f64,
}

impl Verification {
    /// The larger of the two deviations.
    pub fn max_deviation(&self) -> f64 {
        self.circuit_deviation.max(self.symbolic_deviation)
    }
}

/// Simulate the circuit for `(phases, x)` and compare it with both products.
///
/// Fails with [`QspError::NumericalMismatch`] when either deviation
/// exceeds `tolerance`.
pub fn verify(phases: &PhaseSequence, x: f64, tolerance: f64) -> QspResult<Verification> {
    let circuit = build_circuit(phases, x)?.unitary()?;
    let numeric = build_unitary(phases, x);
    let symbolic = build_polynomial(phases).evaluate(x);

    let verification = Verification {
        x,
        circuit,
        numeric,
        symbolic,
        circuit_deviation: circuit.max_deviation(&numeric),
        symbolic_deviation: symbolic.max_deviation(&numeric),
        tolerance,
    };

    let deviation = verification.max_deviation();
    if deviation.is_nan() || deviation > tolerance {
        warn!("Verification failed at x = {}: deviation {:e}", x, deviation);
        return Err(QspError::NumericalMismatch {
            deviation,
            tolerance,
        });
    }
    debug!("Verified x = {} with deviation {:e}", x, deviation);
    Ok(verification)
}
