//! Validated inputs: phase sequences and signal values.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{QspError, QspResult};

/// A non-empty sequence of finite phases `φ₀ … φ_d`.
///
/// The sequence defines `U = S(φ₀) · ∏ᵢ [W(x) · S(φᵢ)]`, so a sequence of
/// length `d + 1` gives a polynomial of degree at most `d`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PhaseSequence {
    phases: Vec<f64>,
}

impl PhaseSequence {
    /// Validate and wrap `phases`.
    pub fn new(phases: impl Into<Vec<f64>>) -> QspResult<Self> {
        let phases = phases.into();
        if phases.is_empty() {
            return Err(QspError::EmptyPhases);
        }
        if let Some((index, &value)) = phases.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(QspError::NonFinitePhase { index, value });
        }
        Ok(Self { phases })
    }

    /// The phases in order.
    pub fn as_slice(&self) -> &[f64] {
        &self.phases
    }

    /// Number of phases.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of signal operators in the product.
    pub fn degree(&self) -> usize {
        self.phases.len() - 1
    }

    /// The leading phase `φ₀`.
    pub fn first(&self) -> f64 {
        self.phases[0]
    }

    /// Phases `φ₁ … φ_d`, each paired with a preceding signal operator.
    pub fn rest(&self) -> &[f64] {
        &self.phases[1..]
    }

    /// Sum of all phases.
    pub fn total(&self) -> f64 {
        self.phases.iter().sum()
    }
}

impl FromStr for PhaseSequence {
    type Err = QspError;

    /// Parse a comma-separated list such as `0.1, 0.2, -0.3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let phases = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| QspError::InvalidPhase(part.to_string()))
            })
            .collect::<QspResult<Vec<_>>>()?;
        Self::new(phases)
    }
}

impl fmt::Display for PhaseSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, phi) in self.phases.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{phi}")?;
        }
        write!(f, "]")
    }
}

/// A signal value `x` in `[-1, 1]`.
///
/// The circuit path needs a real rotation angle, so it only accepts values
/// that pass this check. The matrix builders take a bare `f64`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Signal(f64);

impl Signal {
    /// Check that `x` is finite and within `[-1, 1]`.
    pub fn new(x: f64) -> QspResult<Self> {
        if x.is_finite() && (-1.0..=1.0).contains(&x) {
            Ok(Self(x))
        } else {
            Err(QspError::SignalOutOfDomain(x))
        }
    }

    /// The raw value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Rx angle realizing `W(x)`: `−2·acos(x)`.
    pub fn angle(self) -> f64 {
        -2.0 * self.0.acos()
    }
}

/// `points` evenly spaced signal values covering `[-1, 1]`.
///
/// A single point sits at 0.
pub fn signal_grid(points: usize) -> Vec<f64> {
    match points {
        0 => vec![],
        1 => vec![0.0],
        n => {
            let step = 2.0 / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { 1.0 } else { -1.0 + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(PhaseSequence::new(vec![]), Err(QspError::EmptyPhases)));
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = PhaseSequence::new(vec![0.1, f64::NAN]).unwrap_err();
        assert!(matches!(err, QspError::NonFinitePhase { index: 1, .. }));
        assert!(PhaseSequence::new(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_degree_and_total() {
        let phases = PhaseSequence::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(phases.degree(), 3);
        assert_eq!(phases.len(), 4);
        assert_eq!(phases.first(), 0.1);
        assert_eq!(phases.rest(), &[0.2, 0.3, 0.4]);
        assert!((phases.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse() {
        let phases: PhaseSequence = " 0.5, -1,2e-1 ".parse().unwrap();
        assert_eq!(phases.as_slice(), &[0.5, -1.0, 0.2]);
        assert_eq!(phases.to_string(), "[0.5, -1, 0.2]");

        assert!(matches!(
            "0.1,abc".parse::<PhaseSequence>(),
            Err(QspError::InvalidPhase(p)) if p == "abc"
        ));
        assert!(matches!("".parse::<PhaseSequence>(), Err(QspError::EmptyPhases)));
    }

    #[test]
    fn test_signal_domain() {
        assert!(Signal::new(1.0).is_ok());
        assert!(Signal::new(-1.0).is_ok());
        assert!(matches!(Signal::new(1.5), Err(QspError::SignalOutOfDomain(_))));
        assert!(Signal::new(f64::NAN).is_err());
        assert!((Signal::new(1.0).unwrap().angle()).abs() < 1e-15);
    }

    #[test]
    fn test_signal_grid() {
        assert!(signal_grid(0).is_empty());
        assert_eq!(signal_grid(1), vec![0.0]);
        assert_eq!(signal_grid(5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }
}
