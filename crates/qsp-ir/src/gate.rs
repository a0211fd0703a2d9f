//! Gate vocabulary.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;
use crate::unitary::Unitary2x2;

/// Built-in gates, named as in OpenQASM 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    Rx(ParameterExpression),
    Ry(ParameterExpression),
    Rz(ParameterExpression),
    /// Phase gate `diag(1, e^{iλ})`.
    P(ParameterExpression),
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
    CX,
    CZ,
    Swap,
}

impl StandardGate {
    #[inline]
    pub fn name(&self) -> &'static str {
        use StandardGate::*;
        match self {
            I => "id",
            X => "x",
            Y => "y",
            Z => "z",
            H => "h",
            S => "s",
            Sdg => "sdg",
            T => "t",
            Tdg => "tdg",
            SX => "sx",
            Rx(_) => "rx",
            Ry(_) => "ry",
            Rz(_) => "rz",
            P(_) => "p",
            U(..) => "u",
            CX => "cx",
            CZ => "cz",
            Swap => "swap",
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        if matches!(self, Self::CX | Self::CZ | Self::Swap) { 2 } else { 1 }
    }

    /// Angle operands, in declaration order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            Self::Rx(a) | Self::Ry(a) | Self::Rz(a) | Self::P(a) => vec![a],
            Self::U(theta, phi, lambda) => vec![theta, phi, lambda],
            _ => Vec::new(),
        }
    }

    pub fn is_parameterized(&self) -> bool {
        self.parameters().into_iter().any(ParameterExpression::is_symbolic)
    }

    /// Same gate with `name` replaced by `value` in its angles.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        let b = |p: &ParameterExpression| p.bind(name, value);
        match self {
            Self::Rx(a) => Self::Rx(b(a)),
            Self::Ry(a) => Self::Ry(b(a)),
            Self::Rz(a) => Self::Rz(b(a)),
            Self::P(a) => Self::P(b(a)),
            Self::U(theta, phi, lambda) => Self::U(b(theta), b(phi), b(lambda)),
            fixed => fixed.clone(),
        }
    }

    /// Matrix of a one-qubit gate with numeric angles.
    pub fn matrix(&self) -> IrResult<Unitary2x2> {
        let m = match self {
            Self::I => Unitary2x2::identity(),
            Self::X => Unitary2x2::x(),
            Self::Y => Unitary2x2::y(),
            Self::Z => Unitary2x2::z(),
            Self::H => Unitary2x2::h(),
            Self::S => Unitary2x2::p(FRAC_PI_2),
            Self::Sdg => Unitary2x2::p(-FRAC_PI_2),
            Self::T => Unitary2x2::p(FRAC_PI_4),
            Self::Tdg => Unitary2x2::p(-FRAC_PI_4),
            Self::SX => Unitary2x2::sx(),
            Self::Rx(a) => Unitary2x2::rx(resolve(a)?),
            Self::Ry(a) => Unitary2x2::ry(resolve(a)?),
            Self::Rz(a) => Unitary2x2::rz(resolve(a)?),
            Self::P(a) => Unitary2x2::p(resolve(a)?),
            Self::U(theta, phi, lambda) => {
                Unitary2x2::u(resolve(theta)?, resolve(phi)?, resolve(lambda)?)
            }
            Self::CX | Self::CZ | Self::Swap => {
                return Err(IrError::QubitCountMismatch {
                    gate_name: self.name().into(),
                    expected: 1,
                    got: self.num_qubits(),
                });
            }
        };
        Ok(m)
    }
}

/// Numeric value of an angle; free symbols and non-finite results fail.
pub(crate) fn resolve(angle: &ParameterExpression) -> IrResult<f64> {
    if let Some(free) = angle.symbols().into_iter().next() {
        return Err(IrError::UnboundParameter(free));
    }
    angle
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IrError::NonFiniteParameter(angle.to_string()))
}

/// A placed gate, optionally labelled for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: StandardGate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    pub fn standard(kind: StandardGate) -> Self {
        Self { kind, label: None }
    }

    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Self::standard(kind)
    }
}
