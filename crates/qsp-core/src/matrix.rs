//! Numeric QSP matrix products.

use num_complex::Complex64;
use qsp_ir::Unitary2x2;

use crate::phases::PhaseSequence;

/// `√(1 − x²)` over the complex numbers.
///
/// Real for `|x| ≤ 1`, purely imaginary outside.
pub(crate) fn signal_sqrt(x: f64) -> Complex64 {
    Complex64::new(1.0 - x * x, 0.0).sqrt()
}

/// The signal operator `W(x) = [[x, i√(1−x²)], [i√(1−x²), x]]`.
pub fn signal_operator(x: f64) -> Unitary2x2 {
    let diag = Complex64::new(x, 0.0);
    let off = Complex64::I * signal_sqrt(x);
    Unitary2x2::new(diag, off, off, diag)
}

/// The phase operator `S(φ) = diag(e^{iφ}, e^{−iφ})`.
pub fn phase_operator(phi: f64) -> Unitary2x2 {
    Unitary2x2::diagonal(Complex64::from_polar(1.0, phi), Complex64::from_polar(1.0, -phi))
}

/// Compute `S(φ₀) · ∏ᵢ [W(x) · S(φᵢ)]`.
///
/// Any finite `x` is accepted. Outside `[-1, 1]` the product is defined
/// but not unitary.
pub fn build_unitary(phases: &PhaseSequence, x: f64) -> Unitary2x2 {
    let w = signal_operator(x);
    phases
        .rest()
        .iter()
        .fold(phase_operator(phases.first()), |acc, &phi| {
            acc * w * phase_operator(phi)
        })
}

/// `|⟨0|U|0⟩|²`, the probability a sampled estimate converges to.
pub fn expected_probability(phases: &PhaseSequence, x: f64) -> f64 {
    build_unitary(phases, x).get(0, 0).norm_sqr()
}
