//! Error types for QSP evaluation.

use qsp_hal::HalError;
use qsp_ir::IrError;
use thiserror::Error;

/// Errors that can occur while building or estimating a QSP sequence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QspError {
    /// The phase sequence has no phases.
    #[error("Phase sequence must contain at least one phase")]
    EmptyPhases,

    /// A phase is NaN or infinite.
    #[error("Phase {index} is not finite: {value}")]
    NonFinitePhase {
        /// Position in the sequence.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// A phase could not be parsed as a number.
    #[error("Cannot parse phase '{0}'")]
    InvalidPhase(String),

    /// The signal value lies outside [-1, 1] or is not finite.
    #[error("Signal value {0} is outside [-1, 1]")]
    SignalOutOfDomain(f64),

    /// Shot count is zero.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Circuit and matrix product disagree.
    #[error("Numerical mismatch: deviation {deviation:e} exceeds tolerance {tolerance:e}")]
    NumericalMismatch {
        /// Largest elementwise deviation found.
        deviation: f64,
        /// Tolerance it was checked against.
        tolerance: f64,
    },

    /// Backend submission or execution failed.
    #[error(transparent)]
    Backend(#[from] HalError),

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for QSP operations.
pub type QspResult<T> = Result<T, QspError>;
