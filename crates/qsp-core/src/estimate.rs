//! Sampled estimates of the all-zero outcome probability.

use std::time::Duration;

use futures::future::try_join_all;
use qsp_hal::{Backend, Counts, DEFAULT_POLL_INTERVAL, ExecutionResult, HalResult, JobId, WorkspaceConfig};
use qsp_ir::Circuit;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::circuit::build_circuit;
use crate::error::{QspError, QspResult};
use crate::phases::{PhaseSequence, Signal};

/// z-score of a two-sided 95% interval.
const Z_95: f64 = 1.959_963_984_540_054;

/// Fraction of all-zero outcomes with its binomial uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    /// Estimated probability of the all-zero bit-string.
    pub probability: f64,
    /// Number of all-zero outcomes.
    pub zeros: u64,
    /// Number of outcomes counted.
    pub shots: u64,
    /// Binomial standard error `√(p(1−p)/n)`.
    pub std_error: f64,
    /// Lower end of the 95% interval, clamped to 0.
    pub ci_low: f64,
    /// Upper end of the 95% interval, clamped to 1.
    pub ci_high: f64,
}

impl Estimate {
    /// Estimate from raw counts.
    pub fn new(zeros: u64, shots: u64) -> Self {
        let n = shots.max(1) as f64;
        let probability = zeros as f64 / n;
        let std_error = (probability * (1.0 - probability) / n).sqrt();
        Self {
            probability,
            zeros,
            shots,
            std_error,
            ci_low: (probability - Z_95 * std_error).max(0.0),
            ci_high: (probability + Z_95 * std_error).min(1.0),
        }
    }

    /// Estimate from a histogram of `width`-bit outcomes.
    pub fn from_counts(counts: &Counts, width: usize) -> Self {
        let zeros = counts.get(&"0".repeat(width));
        Self::new(zeros, counts.total_shots())
    }

    /// Whether `p` lies within `sigmas` standard errors of the estimate.
    ///
    /// A zero standard error is widened to one shot's worth.
    pub fn is_consistent_with(&self, p: f64, sigmas: f64) -> bool {
        let spread = self.std_error.max(1.0 / self.shots.max(1) as f64);
        (self.probability - p).abs() <= sigmas * spread
    }
}

/// How long to wait on each job, and how often to poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitPolicy {
    /// Delay between status checks.
    pub poll_interval: Duration,
    /// Give up after this long, if set.
    pub timeout: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl WaitPolicy {
    /// The poll interval and timeout of a workspace configuration.
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            timeout: config.timeout(),
        }
    }

    async fn wait(&self, backend: &dyn Backend, job_id: &JobId) -> HalResult<ExecutionResult> {
        match self.timeout {
            Some(timeout) => {
                backend
                    .wait_timeout(job_id, self.poll_interval, timeout)
                    .await
            }
            None => backend.wait_polling(job_id, self.poll_interval).await,
        }
    }
}

fn check_shots(shots: u32) -> QspResult<()> {
    if shots == 0 {
        return Err(QspError::InvalidShots("shots must be positive".into()));
    }
    Ok(())
}

fn measured(circuit: &Circuit) -> QspResult<Circuit> {
    let mut circuit = circuit.clone();
    if !circuit.has_measurements() {
        circuit.measure_all()?;
    }
    Ok(circuit)
}

/// Run `circuit` for `shots` executions and estimate P(all zeros).
///
/// Every qubit is measured unless the circuit already measures; then
/// only its classical bits count towards "all zeros".
pub async fn estimate_probability(
    backend: &dyn Backend,
    circuit: &Circuit,
    shots: u32,
) -> QspResult<Estimate> {
    estimate_probability_with(backend, circuit, shots, WaitPolicy::default()).await
}

/// [`estimate_probability`] with an explicit wait policy.
#[instrument(skip(backend, circuit, policy), fields(backend = backend.name(), circuit = circuit.name()))]
pub async fn estimate_probability_with(
    backend: &dyn Backend,
    circuit: &Circuit,
    shots: u32,
    policy: WaitPolicy,
) -> QspResult<Estimate> {
    check_shots(shots)?;
    let circuit = measured(circuit)?;

    let job_id = backend.submit(&circuit, shots).await?;
    debug!("Submitted job {} for {} shots", job_id, shots);
    let result = policy.wait(backend, &job_id).await?;

    let estimate = Estimate::from_counts(&result.counts, circuit.outcome_width());
    debug!(
        "Job {} gave {}/{} zeros",
        job_id, estimate.zeros, estimate.shots
    );
    Ok(estimate)
}

/// One estimate per signal value, in input order.
///
/// Every `x` is checked before anything is submitted. All jobs are
/// submitted before any result is awaited.
pub async fn sweep(
    backend: &dyn Backend,
    phases: &PhaseSequence,
    xs: &[f64],
    shots: u32,
) -> QspResult<Vec<Estimate>> {
    sweep_with(backend, phases, xs, shots, WaitPolicy::default()).await
}

/// [`sweep`] with an explicit wait policy.
#[instrument(skip(backend, phases, xs, policy), fields(backend = backend.name(), points = xs.len()))]
pub async fn sweep_with(
    backend: &dyn Backend,
    phases: &PhaseSequence,
    xs: &[f64],
    shots: u32,
    policy: WaitPolicy,
) -> QspResult<Vec<Estimate>> {
    check_shots(shots)?;
    for &x in xs {
        Signal::new(x)?;
    }
    let circuits = xs
        .iter()
        .map(|&x| build_circuit(phases, x).and_then(|c| measured(&c)))
        .collect::<QspResult<Vec<_>>>()?;

    info!(
        "Sweeping {} points on {} with {} shots each",
        xs.len(),
        backend.name(),
        shots
    );

    let mut jobs = Vec::with_capacity(circuits.len());
    for circuit in &circuits {
        jobs.push(backend.submit(circuit, shots).await?);
    }
    debug!("Submitted {} jobs", jobs.len());

    let results = try_join_all(jobs.iter().map(|job| policy.wait(backend, job))).await?;

    Ok(results
        .iter()
        .zip(&circuits)
        .map(|(result, circuit)| Estimate::from_counts(&result.counts, circuit.outcome_width()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_statistics() {
        let e = Estimate::new(250, 1000);
        assert_eq!(e.probability, 0.25);
        assert!((e.std_error - (0.25 * 0.75 / 1000.0_f64).sqrt()).abs() < 1e-15);
        assert!(e.ci_low < 0.25 && e.ci_high > 0.25);
        assert!(e.is_consistent_with(0.26, 3.0));
        assert!(!e.is_consistent_with(0.5, 3.0));
    }

    #[test]
    fn test_estimate_clamps_interval() {
        let all = Estimate::new(10, 10);
        assert_eq!(all.probability, 1.0);
        assert_eq!(all.std_error, 0.0);
        assert_eq!(all.ci_high, 1.0);
        assert!(all.is_consistent_with(1.0, 1.0));

        let none = Estimate::new(0, 0);
        assert_eq!(none.probability, 0.0);
        assert_eq!(none.ci_low, 0.0);
    }

    #[test]
    fn test_from_counts_uses_all_zero_key() {
        let counts = Counts::from_pairs([("00", 30u64), ("01", 10), ("11", 60)]);
        let e = Estimate::from_counts(&counts, 2);
        assert_eq!(e.zeros, 30);
        assert_eq!(e.shots, 100);
    }

    #[test]
    fn test_measured_adds_measurements_once() {
        let mut circuit = Circuit::with_size("c", 1, 0);
        circuit.h(qsp_ir::QubitId(0)).unwrap();
        let m = measured(&circuit).unwrap();
        assert!(m.has_measurements());
        assert_eq!(measured(&m).unwrap(), m);
    }
}
