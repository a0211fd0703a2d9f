//! In-process targets for the QSP workbench.
//!
//! [`SimulatorBackend`] evolves a dense statevector and samples shots from
//! it; passing a seed makes the counts reproducible. [`ApiValidatorBackend`]
//! only checks circuits against a provider gate set and answers every
//! shot with the all-zero bit-string.
//!
//! Memory grows as `16 * 2^n` bytes, so the default limit of 20 qubits
//! needs about 16 MB per job.
//!
//! ```ignore
//! use qsp_adapter_sim::SimulatorBackend;
//! use qsp_hal::Backend;
//! use qsp_ir::{Circuit, QubitId};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let backend = SimulatorBackend::with_seed(7);
//! let mut circuit = Circuit::with_size("signal", 1, 1);
//! circuit.rx(-2.0 * 0.5_f64.acos(), QubitId(0))?;
//! circuit.measure_all()?;
//!
//! let job_id = backend.submit(&circuit, 1000).await?;
//! let result = backend.wait(&job_id).await?;
//! println!("P(0) ~ {}", result.counts.probability("0"));
//! # Ok(())
//! # }
//! ```

mod jobs;
mod simulator;
mod statevector;
mod validator;

pub use simulator::{DEFAULT_MAX_QUBITS, MAX_SIMULATED_QUBITS, SimulatorBackend};
pub use validator::{ApiValidatorBackend, DEFAULT_VALIDATOR_QUBITS};

use qsp_hal::BackendRegistry;

/// Backend kind name of [`SimulatorBackend`].
pub const SIMULATOR_KIND: &str = "simulator";

/// Backend kind name of [`ApiValidatorBackend`].
pub const API_VALIDATOR_KIND: &str = "api_validator";

/// Register both local backends under their kind names.
pub fn register_all(registry: &mut BackendRegistry) {
    registry.register::<SimulatorBackend>(SIMULATOR_KIND);
    registry.register::<ApiValidatorBackend>(API_VALIDATOR_KIND);
}
