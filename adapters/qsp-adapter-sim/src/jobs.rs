//! Job bookkeeping and limits shared by the in-process backends.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use uuid::Uuid;

use qsp_hal::{
    BackendConfig, Capabilities, ExecutionResult, HalError, HalResult, Job, JobId, JobStatus,
};

struct Entry {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Jobs of one backend instance, keyed by id.
#[derive(Default)]
pub(crate) struct JobTable {
    entries: Mutex<FxHashMap<JobId, Entry>>,
}

impl JobTable {
    fn lock(&self) -> MutexGuard<'_, FxHashMap<JobId, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new running job under a fresh id.
    pub(crate) fn start(&self, backend: &str, shots: u32) -> JobId {
        let id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(id.clone(), shots)
            .with_backend(backend)
            .with_status(JobStatus::Running);
        self.lock().insert(id.clone(), Entry { job, result: None });
        id
    }

    /// Settle a running job with the outcome of its execution.
    pub(crate) fn finish(&self, id: &JobId, outcome: HalResult<ExecutionResult>) {
        if let Some(entry) = self.lock().get_mut(id) {
            let status = match outcome {
                Ok(result) => {
                    entry.result = Some(result);
                    JobStatus::Completed
                }
                Err(err) => JobStatus::Failed(err.to_string()),
            };
            entry.job = entry.job.clone().with_status(status);
        }
    }

    pub(crate) fn status(&self, id: &JobId) -> HalResult<JobStatus> {
        self.lock()
            .get(id)
            .map(|entry| entry.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(id.to_string()))
    }

    pub(crate) fn result(&self, id: &JobId) -> HalResult<ExecutionResult> {
        let entries = self.lock();
        let entry = entries
            .get(id)
            .ok_or_else(|| HalError::JobNotFound(id.to_string()))?;
        match (&entry.job.status, &entry.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(reason), _) => Err(HalError::JobFailed(reason.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            _ => Err(HalError::JobNotReady(id.to_string())),
        }
    }

    /// Cancel a pending job. Finished jobs keep their state.
    pub(crate) fn cancel(&self, id: &JobId) -> HalResult<()> {
        let mut entries = self.lock();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| HalError::JobNotFound(id.to_string()))?;
        entry.job = entry.job.clone().with_status(JobStatus::Cancelled);
        Ok(())
    }
}

/// Reject zero shots and anything above `capabilities.max_shots`.
pub(crate) fn check_shots(capabilities: &Capabilities, shots: u32) -> HalResult<()> {
    if shots == 0 {
        return Err(HalError::InvalidShots("shots must be positive".into()));
    }
    if shots > capabilities.max_shots {
        return Err(HalError::InvalidShots(format!(
            "{shots} shots requested, {} allows at most {}",
            capabilities.name, capabilities.max_shots
        )));
    }
    Ok(())
}

/// The `max_qubits` setting of `config`, or `default` when absent.
pub(crate) fn max_qubits(config: &BackendConfig, default: u32) -> HalResult<u32> {
    config.extra_u64("max_qubits")?.map_or(Ok(default), |v| {
        u32::try_from(v)
            .map_err(|_| HalError::Configuration(format!("max_qubits {v} is out of range")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_hal::Counts;

    #[test]
    fn test_lifecycle() {
        let table = JobTable::default();
        let id = table.start("sim", 4);
        assert_eq!(table.status(&id).unwrap(), JobStatus::Running);
        assert!(matches!(table.result(&id), Err(HalError::JobNotReady(_))));

        let result = ExecutionResult::new(Counts::from_pairs([("1", 4u64)]), 4);
        table.finish(&id, Ok(result));
        assert_eq!(table.result(&id).unwrap().counts.get("1"), 4);

        // too late to cancel
        table.cancel(&id).unwrap();
        assert_eq!(table.status(&id).unwrap(), JobStatus::Completed);
    }

    #[test]
    fn test_failed_and_cancelled() {
        let table = JobTable::default();
        let failed = table.start("sim", 1);
        table.finish(&failed, Err(HalError::InvalidCircuit("bad gate".into())));
        assert!(matches!(table.result(&failed), Err(HalError::JobFailed(msg)) if msg.contains("bad gate")));

        let cancelled = table.start("sim", 1);
        table.cancel(&cancelled).unwrap();
        assert!(matches!(table.result(&cancelled), Err(HalError::JobCancelled)));

        let unknown = JobId::new("nope");
        assert!(matches!(table.cancel(&unknown), Err(HalError::JobNotFound(_))));
    }

    #[test]
    fn test_limits() {
        let caps = Capabilities::simulator(2);
        assert!(check_shots(&caps, 1).is_ok());
        assert!(matches!(check_shots(&caps, 0), Err(HalError::InvalidShots(_))));
        assert!(check_shots(&caps, caps.max_shots + 1).is_err());

        let config = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!(1u64 << 40));
        assert!(matches!(max_qubits(&config, 20), Err(HalError::Configuration(_))));
        assert_eq!(max_qubits(&BackendConfig::new("sim"), 20).unwrap(), 20);
    }
}
