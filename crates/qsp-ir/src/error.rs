//! IR error type.

use thiserror::Error;

use crate::qubit::{ClbitId, QubitId};

/// Failures while building, binding or evaluating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    #[error("Qubit {qubit} is outside the circuit{}", in_gate(.gate_name))]
    QubitNotFound {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    #[error("Classical bit {clbit} is outside the circuit")]
    ClbitNotFound { clbit: ClbitId },

    /// Operand count does not match the gate arity.
    #[error("Gate '{gate_name}' acts on {expected} qubits but was given {got}")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    #[error("Qubit {qubit} appears twice{}", in_gate(.gate_name))]
    DuplicateQubit {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    #[error("Measurement pairs {qubits} qubits with {clbits} classical bits")]
    MeasureMismatch { qubits: usize, clbits: usize },

    /// A symbol was left free where a number is needed.
    #[error("Parameter '{0}' has no value")]
    UnboundParameter(String),

    /// Evaluation produced NaN or an infinity.
    #[error("Parameter expression '{0}' is not a finite real")]
    NonFiniteParameter(String),

    #[error("Expected a single-qubit circuit, found {0} qubits")]
    NotSingleQubit(usize),
}

#[allow(clippy::ref_option)]
fn in_gate(gate_name: &Option<String>) -> String {
    gate_name
        .as_deref()
        .map(|name| format!(" in gate '{name}'"))
        .unwrap_or_default()
}

pub type IrResult<T> = Result<T, IrError>;
