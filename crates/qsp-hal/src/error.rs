//! HAL error type.

use thiserror::Error;

/// Failures reported by backends, the registry and the workspace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// No backend kind is registered under this name.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job cancelled")]
    JobCancelled,

    #[error("Unknown job {0}")]
    JobNotFound(String),

    /// Result requested while the job is still pending.
    #[error("Job {0} is still pending")]
    JobNotReady(String),

    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Circuit is wider than the backend allows.
    #[error("Circuit too large: {0}")]
    CircuitTooLarge(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Timed out waiting for job {0}")]
    Timeout(String),

    #[error("No target given and the workspace has no default target")]
    NoDefaultTarget,

    #[error("Unknown target '{0}'")]
    UnknownTarget(String),
}

pub type HalResult<T> = Result<T, HalError>;
