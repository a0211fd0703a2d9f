//! API-validator backend.
//!
//! Mimics a provider's cloud validator: circuits are checked against a
//! gate set and qubit limit but never executed. Accepted jobs report the
//! all-zero bit-string for every shot.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use qsp_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, GateSet, HalError, HalResult, JobId, JobStatus, ValidationResult,
    check_circuit,
};
use qsp_ir::Circuit;

use crate::jobs::{self, JobTable};

/// Qubit limit when none is configured, matching an H1-class device.
pub const DEFAULT_VALIDATOR_QUBITS: u32 = 20;

pub struct ApiValidatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: JobTable,
}

impl ApiValidatorBackend {
    /// `quantinuum.sim`: the Quantinuum gate set on 20 qubits.
    pub fn new() -> Self {
        Self::with_capabilities(
            BackendConfig::new("quantinuum.sim"),
            Capabilities::quantinuum("quantinuum.sim", DEFAULT_VALIDATOR_QUBITS).as_emulator(),
        )
    }

    /// The capability name is replaced by the configured backend name.
    pub fn with_capabilities(config: BackendConfig, capabilities: Capabilities) -> Self {
        let capabilities = Capabilities {
            name: config.name.clone(),
            ..capabilities
        };
        Self {
            config,
            capabilities,
            jobs: JobTable::default(),
        }
    }

    fn all_zero(circuit: &Circuit, shots: u32) -> ExecutionResult {
        let zeros = "0".repeat(circuit.outcome_width());
        ExecutionResult::new(Counts::from_pairs([(zeros, u64::from(shots))]), shots)
            .with_execution_time(0)
            .with_metadata(serde_json::json!({ "validated": true }))
    }
}

impl Default for ApiValidatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for ApiValidatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(check_circuit(&self.capabilities, circuit))
    }

    #[instrument(skip(self, circuit), fields(backend = self.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        jobs::check_shots(&self.capabilities, shots)?;

        if let ValidationResult::Invalid { reasons } = check_circuit(&self.capabilities, circuit) {
            let reasons = reasons.join("; ");
            warn!(circuit = circuit.name(), %reasons, "validation failed");
            return Err(HalError::InvalidCircuit(reasons));
        }

        let job_id = self.jobs.start(self.name(), shots);
        self.jobs.finish(&job_id, Ok(Self::all_zero(circuit, shots)));
        debug!(%job_id, "circuit validated");
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs.status(job_id)
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.jobs.result(job_id)
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.jobs.cancel(job_id)
    }
}

impl BackendFactory for ApiValidatorBackend {
    /// Reads `max_qubits` and a `gate_set` preset name.
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let num_qubits = jobs::max_qubits(&config, DEFAULT_VALIDATOR_QUBITS)?;
        let gate_set = match config.extra_str("gate_set")? {
            None => GateSet::quantinuum(),
            Some(name) => GateSet::preset(name)
                .ok_or_else(|| HalError::Configuration(format!("unknown gate set '{name}'")))?,
        };
        let capabilities = Capabilities {
            gate_set,
            ..Capabilities::quantinuum(config.name.clone(), num_qubits).as_emulator()
        };
        Ok(Self::with_capabilities(config, capabilities))
    }
}
