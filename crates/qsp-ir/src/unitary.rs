//! Single-qubit operator algebra.
//!
//! Conventions: `Rx(θ) = exp(-iθX/2)`, `Rz(θ) = exp(-iθZ/2)` and
//! `P(λ) = diag(1, e^{iλ})`.

use std::fmt;
use std::ops;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Bound on `|U†U - I|` accepted by [`Unitary2x2::is_unitary`].
pub const UNITARY_TOLERANCE: f64 = 1e-10;

fn real(v: f64) -> Complex64 {
    Complex64::new(v, 0.0)
}

fn cis(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

/// Row-major 2x2 complex matrix `[[a, b], [c, d]]`.
///
/// Nothing enforces unitarity; a signal operator evaluated outside
/// [-1, 1] is a legitimate non-unitary value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unitary2x2 {
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    pub fn diagonal(a: Complex64, d: Complex64) -> Self {
        Self::new(a, Complex64::ZERO, Complex64::ZERO, d)
    }

    fn anti_diagonal(b: Complex64, c: Complex64) -> Self {
        Self::new(Complex64::ZERO, b, c, Complex64::ZERO)
    }

    pub fn identity() -> Self {
        Self::diagonal(Complex64::ONE, Complex64::ONE)
    }

    pub fn x() -> Self {
        Self::anti_diagonal(Complex64::ONE, Complex64::ONE)
    }

    pub fn y() -> Self {
        Self::anti_diagonal(-Complex64::I, Complex64::I)
    }

    pub fn z() -> Self {
        Self::diagonal(Complex64::ONE, -Complex64::ONE)
    }

    pub fn h() -> Self {
        let r = real(std::f64::consts::FRAC_1_SQRT_2);
        Self::new(r, r, r, -r)
    }

    /// Square root of X.
    pub fn sx() -> Self {
        let plus = Complex64::new(0.5, 0.5);
        let minus = Complex64::new(0.5, -0.5);
        Self::new(plus, minus, minus, plus)
    }

    pub fn rx(theta: f64) -> Self {
        let (sin, cos) = (theta / 2.0).sin_cos();
        let off = Complex64::new(0.0, -sin);
        Self::new(real(cos), off, off, real(cos))
    }

    pub fn ry(theta: f64) -> Self {
        let (sin, cos) = (theta / 2.0).sin_cos();
        Self::new(real(cos), real(-sin), real(sin), real(cos))
    }

    pub fn rz(theta: f64) -> Self {
        Self::diagonal(cis(-theta / 2.0), cis(theta / 2.0))
    }

    pub fn p(lambda: f64) -> Self {
        Self::diagonal(Complex64::ONE, cis(lambda))
    }

    /// `U(θ, φ, λ) = Rz(φ)·Ry(θ)·Rz(λ)` up to global phase.
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (sin, cos) = (theta / 2.0).sin_cos();
        Self::new(
            real(cos),
            -cis(lambda) * sin,
            cis(phi) * sin,
            cis(phi + lambda) * cos,
        )
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[2 * row + col]
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn dagger(&self) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Largest elementwise modulus of `self - other`.
    pub fn max_deviation(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    pub fn is_unitary(&self) -> bool {
        (self.dagger() * *self).max_deviation(&Self::identity()) < UNITARY_TOLERANCE
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::many_single_char_names)]
    fn mul(self, rhs: Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = rhs.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }
}

impl fmt::Display for Unitary2x2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.data.map(|z| format!("{:+.6}{:+.6}i", z.re, z.im));
        writeln!(f, "[{a}  {b}]")?;
        write!(f, "[{c}  {d}]")
    }
}
