//! QSP Core
//!
//! Quantum signal processing on a single qubit. A [`PhaseSequence`]
//! `φ₀ … φ_d` defines
//!
//! ```text
//! U(x) = S(φ₀) · ∏ᵢ [W(x) · S(φᵢ)]
//! W(x) = [[x, i√(1−x²)], [i√(1−x²), x]]
//! S(φ) = diag(e^{iφ}, e^{−iφ})
//! ```
//!
//! whose top-left entry is a polynomial of degree at most `d` in `x`.
//!
//! The same unitary is produced three ways:
//!
//! - [`build_unitary`]: numeric matrix product at one `x`
//! - [`build_polynomial`]: symbolic product, evaluated at any `x`
//! - [`build_circuit`]: `Rz`/`Rx` gate sequence for a backend
//!
//! [`verify`] compares them. [`estimate_probability`] and [`sweep`] run
//! circuits on a [`qsp_hal::Backend`] and estimate `|U(x)₀₀|²` from the
//! fraction of all-zero outcomes.
//!
//! # Example
//!
//! ```
//! use qsp_core::{PhaseSequence, build_circuit, build_unitary, expected_probability};
//!
//! let phases: PhaseSequence = "0.1, 0.2, 0.3, 0.4".parse().unwrap();
//! let u = build_unitary(&phases, 0.5);
//! let circuit = build_circuit(&phases, 0.5).unwrap();
//! assert!(circuit.unitary().unwrap().max_deviation(&u) < 1e-9);
//! assert!((expected_probability(&phases, 0.5) - u.get(0, 0).norm_sqr()).abs() < 1e-15);
//! ```

pub mod circuit;
pub mod error;
pub mod estimate;
pub mod matrix;
pub mod phases;
pub mod polynomial;
pub mod verify;

pub use circuit::{SIGNAL_SYMBOL, build_circuit, build_template, signal_angle, signal_angle_expression};
pub use error::{QspError, QspResult};
pub use estimate::{
    Estimate, WaitPolicy, estimate_probability, estimate_probability_with, sweep, sweep_with,
};
pub use matrix::{build_unitary, expected_probability, phase_operator, signal_operator};
pub use phases::{PhaseSequence, Signal, signal_grid};
pub use polynomial::{Polynomial, PolynomialMatrix, SignalPolynomial, build_polynomial};
pub use verify::{DEFAULT_TOLERANCE, Verification, verify};
