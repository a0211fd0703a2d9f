//! Symbolic QSP products over signal polynomials.
//!
//! Every entry of a QSP unitary has the form `p(x) + √(1−x²)·q(x)` with
//! complex polynomials `p` and `q`. Products are kept in that form by
//! reducing `(√(1−x²))² = 1 − x²` at every multiplication.

use num_complex::Complex64;
use qsp_ir::Unitary2x2;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, Mul};

use crate::matrix::signal_sqrt;
use crate::phases::PhaseSequence;

/// A polynomial in `x` with complex coefficients, lowest power first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Polynomial {
    coeffs: Vec<Complex64>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant polynomial.
    pub fn constant(c: Complex64) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// The monomial `x`.
    pub fn x() -> Self {
        Self::from_coeffs(vec![Complex64::ZERO, Complex64::ONE])
    }

    /// Build from coefficients, lowest power first.
    pub fn from_coeffs(mut coeffs: Vec<Complex64>) -> Self {
        while coeffs.last() == Some(&Complex64::ZERO) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Coefficients, lowest power first. Empty for zero.
    pub fn coeffs(&self) -> &[Complex64] {
        &self.coeffs
    }

    /// Coefficient of `x^k`.
    pub fn coeff(&self, k: usize) -> Complex64 {
        self.coeffs.get(k).copied().unwrap_or(Complex64::ZERO)
    }

    /// Degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Whether this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Evaluate with Horner's rule.
    pub fn evaluate(&self, x: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex64::ZERO, |acc, &c| acc * x + c)
    }

    /// Whether all terms share the parity of `parity` (0 even, 1 odd).
    ///
    /// Coefficients with magnitude below `tolerance` are ignored.
    pub fn has_parity(&self, parity: usize, tolerance: f64) -> bool {
        self.coeffs
            .iter()
            .enumerate()
            .all(|(k, c)| k % 2 == parity % 2 || c.norm() < tolerance)
    }

    fn scale(&self, factor: Complex64) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|&c| c * factor).collect())
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Polynomial {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::from_coeffs((0..len).map(|k| self.coeff(k) + rhs.coeff(k)).collect())
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![Complex64::ZERO; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::from_coeffs(coeffs)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (k, c) in self.coeffs.iter().enumerate() {
            if *c == Complex64::ZERO {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "({:.6}{:+.6}i)", c.re, c.im)?;
            match k {
                0 => {}
                1 => write!(f, "·x")?,
                _ => write!(f, "·x^{k}")?,
            }
        }
        Ok(())
    }
}

/// An entry `p(x) + √(1−x²)·q(x)` of a QSP matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SignalPolynomial {
    /// Polynomial part.
    pub p: Polynomial,
    /// Coefficient of `√(1−x²)`.
    pub q: Polynomial,
}

impl SignalPolynomial {
    /// Entry with only a polynomial part.
    pub fn polynomial(p: Polynomial) -> Self {
        Self {
            p,
            q: Polynomial::zero(),
        }
    }

    /// Entry with only a `√(1−x²)` part.
    pub fn radical(q: Polynomial) -> Self {
        Self {
            p: Polynomial::zero(),
            q,
        }
    }

    /// Evaluate at `x`, taking the complex square root when `|x| > 1`.
    pub fn evaluate(&self, x: f64) -> Complex64 {
        let z = Complex64::new(x, 0.0);
        self.p.evaluate(z) + signal_sqrt(x) * self.q.evaluate(z)
    }
}

impl Add for &SignalPolynomial {
    type Output = SignalPolynomial;

    fn add(self, rhs: Self) -> SignalPolynomial {
        SignalPolynomial {
            p: &self.p + &rhs.p,
            q: &self.q + &rhs.q,
        }
    }
}

impl Mul for &SignalPolynomial {
    type Output = SignalPolynomial;

    /// `(p₁ + s·q₁)(p₂ + s·q₂) = p₁p₂ + (1−x²)q₁q₂ + s·(p₁q₂ + q₁p₂)`.
    fn mul(self, rhs: Self) -> SignalPolynomial {
        let one_minus_x2 =
            Polynomial::from_coeffs(vec![Complex64::ONE, Complex64::ZERO, -Complex64::ONE]);
        let qq = &(&self.q * &rhs.q) * &one_minus_x2;
        SignalPolynomial {
            p: &(&self.p * &rhs.p) + &qq,
            q: &(&self.p * &rhs.q) + &(&self.q * &rhs.p),
        }
    }
}

impl fmt::Display for SignalPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.p.is_zero(), self.q.is_zero()) {
            (_, true) => write!(f, "{}", self.p),
            (true, false) => write!(f, "√(1-x²)·[{}]", self.q),
            (false, false) => write!(f, "{} + √(1-x²)·[{}]", self.p, self.q),
        }
    }
}

/// A 2×2 matrix of signal polynomials, row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialMatrix {
    /// Entries `[00, 01, 10, 11]`.
    pub entries: [SignalPolynomial; 4],
}

impl PolynomialMatrix {
    /// The symbolic signal operator `W(x)`.
    pub fn signal_operator() -> Self {
        let diag = SignalPolynomial::polynomial(Polynomial::x());
        let off = SignalPolynomial::radical(Polynomial::constant(Complex64::I));
        Self {
            entries: [diag.clone(), off.clone(), off, diag],
        }
    }

    /// The phase operator `S(φ)`, constant in `x`.
    pub fn phase_operator(phi: f64) -> Self {
        let c = |v| SignalPolynomial::polynomial(Polynomial::constant(v));
        Self {
            entries: [
                c(Complex64::from_polar(1.0, phi)),
                SignalPolynomial::default(),
                SignalPolynomial::default(),
                c(Complex64::from_polar(1.0, -phi)),
            ],
        }
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> &SignalPolynomial {
        &self.entries[row * 2 + col]
    }

    /// Evaluate every entry at `x`.
    pub fn evaluate(&self, x: f64) -> Unitary2x2 {
        let [a, b, c, d] = &self.entries;
        Unitary2x2::new(a.evaluate(x), b.evaluate(x), c.evaluate(x), d.evaluate(x))
    }
}

impl Mul for &PolynomialMatrix {
    type Output = PolynomialMatrix;

    fn mul(self, rhs: Self) -> PolynomialMatrix {
        let entry = |r: usize, c: usize| {
            &(self.get(r, 0) * rhs.get(0, c)) + &(self.get(r, 1) * rhs.get(1, c))
        };
        PolynomialMatrix {
            entries: [entry(0, 0), entry(0, 1), entry(1, 0), entry(1, 1)],
        }
    }
}

/// Carry out `S(φ₀) · ∏ᵢ [W(x) · S(φᵢ)]` symbolically in `x`.
///
/// The top-left `p` has degree at most `d` and `q` at most `d − 1`.
pub fn build_polynomial(phases: &PhaseSequence) -> PolynomialMatrix {
    let w = PolynomialMatrix::signal_operator();
    phases
        .rest()
        .iter()
        .fold(PolynomialMatrix::phase_operator(phases.first()), |acc, &phi| {
            &(&acc * &w) * &PolynomialMatrix::phase_operator(phi)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::build_unitary;

    fn phases(v: &[f64]) -> PhaseSequence {
        PhaseSequence::new(v.to_vec()).unwrap()
    }

    #[test]
    fn test_polynomial_arithmetic() {
        let x = Polynomial::x();
        let one = Polynomial::constant(Complex64::ONE);
        let sum = &x + &one;
        let square = &sum * &sum;
        assert_eq!(square.degree(), Some(2));
        assert_eq!(square.coeff(1), Complex64::new(2.0, 0.0));
        assert_eq!(square.evaluate(Complex64::new(2.0, 0.0)), Complex64::new(9.0, 0.0));
        assert!((&x * &Polynomial::zero()).is_zero());
        assert_eq!(Polynomial::zero().degree(), None);
    }

    #[test]
    fn test_radical_squared_reduces() {
        let s = SignalPolynomial::radical(Polynomial::constant(Complex64::ONE));
        let squared = &s * &s;
        assert!(squared.q.is_zero());
        assert_eq!(
            squared.p.coeffs(),
            &[Complex64::ONE, Complex64::ZERO, -Complex64::ONE]
        );
    }

    #[test]
    fn test_degrees_bounded() {
        let p = phases(&[0.1, 0.2, 0.3, 0.4]);
        let m = build_polynomial(&p);
        let top_left = m.get(0, 0);
        assert!(top_left.p.degree().is_some_and(|d| d <= 3));
        assert!(top_left.q.degree().is_none_or(|d| d <= 2));
    }

    #[test]
    fn test_parity_follows_degree() {
        let m = build_polynomial(&phases(&[0.1, 0.2, 0.3, 0.4]));
        assert!(m.get(0, 0).p.has_parity(1, 1e-12));
        assert!(m.get(0, 0).q.has_parity(0, 1e-12));
    }

    #[test]
    fn test_evaluation_matches_numeric_product() {
        let p = phases(&[0.1, 0.2, 0.3, 0.4]);
        let m = build_polynomial(&p);
        for x in [-1.0, -0.6, 0.0, 0.25, 0.5, 1.0, 1.5, -3.0] {
            let deviation = m.evaluate(x).max_deviation(&build_unitary(&p, x));
            assert!(deviation < 1e-9, "x = {x}: {deviation}");
        }
    }

    #[test]
    fn test_single_phase_is_constant() {
        let m = build_polynomial(&phases(&[0.3]));
        assert_eq!(m.get(0, 0).p.degree(), Some(0));
        assert!(m.get(0, 1).p.is_zero() && m.get(0, 1).q.is_zero());
    }

    #[test]
    fn test_display() {
        let m = build_polynomial(&phases(&[0.0, 0.0]));
        assert_eq!(m.get(0, 0).to_string(), "(1.000000+0.000000i)·x");
        assert_eq!(
            m.get(0, 1).to_string(),
            "√(1-x²)·[(0.000000+1.000000i)]"
        );
    }
}
