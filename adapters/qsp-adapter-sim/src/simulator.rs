//! Statevector simulator backend.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, warn};

use qsp_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, JobId, JobStatus, ValidationResult, check_circuit,
};
use qsp_ir::Circuit;

use crate::jobs::{self, JobTable};
use crate::statevector::{Readout, Statevector};

pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Largest qubit limit a simulator accepts; the state alone is 16 GiB.
pub const MAX_SIMULATED_QUBITS: u32 = 30;

/// In-process simulator.
///
/// Each job evolves the statevector once and draws every shot from the
/// final distribution. Jobs are complete by the time `submit` returns.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: JobTable,
    rng: Mutex<StdRng>,
    seed: Option<u64>,
}

impl SimulatorBackend {
    pub fn new() -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS, None)
    }

    /// Limit is clamped to [`MAX_SIMULATED_QUBITS`].
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(BackendConfig::new("simulator"), max_qubits, None)
    }

    /// A simulator whose shot sampling is reproducible for `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS, Some(seed))
    }

    fn build(config: BackendConfig, max_qubits: u32, seed: Option<u64>) -> Self {
        let capabilities = Capabilities {
            name: config.name.clone(),
            ..Capabilities::simulator(max_qubits.min(MAX_SIMULATED_QUBITS))
        };
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            config,
            capabilities,
            jobs: JobTable::default(),
            rng: Mutex::new(rng),
            seed,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn admit(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        jobs::check_shots(&self.capabilities, shots)?;
        let limit = self.capabilities.num_qubits as usize;
        if circuit.num_qubits() > limit {
            return Err(HalError::CircuitTooLarge(format!(
                "{} qubits requested, {} simulates at most {limit}",
                circuit.num_qubits(),
                self.name()
            )));
        }
        if circuit.is_parameterized() {
            let free: Vec<String> = circuit.parameters().into_iter().collect();
            warn!(circuit = circuit.name(), "unbound parameters: {}", free.join(", "));
            return Err(HalError::InvalidCircuit(format!(
                "unbound parameters: {}",
                free.join(", ")
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits()))]
    fn simulate(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let started = Instant::now();

        let mut state = Statevector::new(circuit.num_qubits());
        for instruction in circuit.instructions() {
            state
                .apply(instruction)
                .map_err(|e| HalError::InvalidCircuit(e.to_string()))?;
        }

        let sampler = state.sampler();
        let readout = Readout::new(circuit);
        let mut tally: FxHashMap<usize, u64> = FxHashMap::default();
        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            for _ in 0..shots {
                *tally.entry(sampler.sample(&mut *rng)).or_default() += 1;
            }
        }
        let counts = Counts::from_pairs(
            tally
                .into_iter()
                .map(|(index, n)| (readout.bitstring(index), n)),
        );

        let elapsed = started.elapsed();
        debug!(?elapsed, outcomes = counts.len(), "simulation finished");
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        Ok(ExecutionResult::new(counts, shots).with_execution_time(millis))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
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
        self.admit(circuit, shots)?;
        let job_id = self.jobs.start(self.name(), shots);
        debug!(%job_id, shots, "job started");
        self.jobs.finish(&job_id, self.simulate(circuit, shots));
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

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = jobs::max_qubits(&config, DEFAULT_MAX_QUBITS)?;
        if max_qubits > MAX_SIMULATED_QUBITS {
            return Err(HalError::Configuration(format!(
                "max_qubits {max_qubits} exceeds the simulator limit of {MAX_SIMULATED_QUBITS}"
            )));
        }
        let seed = config.extra_u64("seed")?;
        Ok(Self::build(config, max_qubits, seed))
    }
}
