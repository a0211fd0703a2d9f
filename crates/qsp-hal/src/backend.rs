//! The backend contract.
//!
//! A caller reads [`Backend::capabilities`], optionally asks
//! [`Backend::validate`], then submits and collects through the job
//! methods. The provided `wait*` methods poll [`Backend::status`] until
//! the job reaches a terminal state.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use qsp_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Status poll period of [`Backend::wait`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Settings handed to a [`BackendFactory`].
///
/// Anything beyond name, endpoint and token lands in `extra` and is
/// interpreted by the backend itself.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            token: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    fn typed_extra<'a, T>(
        &'a self,
        key: &str,
        expected: &str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> HalResult<Option<T>> {
        let Some(value) = self.extra.get(key) else {
            return Ok(None);
        };
        read(value).map(Some).ok_or_else(|| {
            HalError::Configuration(format!(
                "backend '{}': '{key}' must be {expected}, got {value}",
                self.name
            ))
        })
    }

    /// Unsigned integer setting; absent is `Ok(None)`, mistyped is an error.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        self.typed_extra(key, "a non-negative integer", Value::as_u64)
    }

    pub fn extra_str(&self, key: &str) -> HalResult<Option<&str>> {
        self.typed_extra(key, "a string", Value::as_str)
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("extra", &self.extra)
            .finish()
    }
}

/// An execution target.
///
/// Implementations reject zero shots with [`HalError::InvalidShots`] and
/// only hand out a result once the job is `Completed`. [`Backend::wait`]
/// has no deadline; use [`Backend::wait_timeout`] when one is needed.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    /// Fixed at construction.
    fn capabilities(&self) -> &Capabilities;

    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Check `circuit` against this backend without submitting it.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.wait_polling(job_id, DEFAULT_POLL_INTERVAL).await
    }

    /// Poll every `poll_interval` until the job finishes.
    async fn wait_polling(
        &self,
        job_id: &JobId,
        poll_interval: Duration,
    ) -> HalResult<ExecutionResult> {
        loop {
            match self.status(job_id).await? {
                JobStatus::Queued | JobStatus::Running => tokio::time::sleep(poll_interval).await,
                JobStatus::Completed => break self.result(job_id).await,
                JobStatus::Failed(reason) => break Err(HalError::JobFailed(reason)),
                JobStatus::Cancelled => break Err(HalError::JobCancelled),
            }
        }
    }

    /// [`Backend::wait_polling`] bounded by `timeout`.
    async fn wait_timeout(
        &self,
        job_id: &JobId,
        poll_interval: Duration,
        timeout: Duration,
    ) -> HalResult<ExecutionResult> {
        match tokio::time::timeout(timeout, self.wait_polling(job_id, poll_interval)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(HalError::Timeout(job_id.to_string())),
        }
    }
}

/// Whether a backend takes jobs right now.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    pub is_available: bool,
    pub queue_depth: Option<u32>,
    pub estimated_wait: Option<Duration>,
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Empty queue and no wait, as for in-process backends.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            estimated_wait: Some(Duration::ZERO),
            status_message: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            estimated_wait: None,
            status_message: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reasons: Vec<String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        *self == Self::Valid
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            Self::Valid => &[],
            Self::Invalid { reasons } => reasons,
        }
    }
}

/// Width, gate names and free symbols of `circuit` against `capabilities`.
pub fn check_circuit(capabilities: &Capabilities, circuit: &Circuit) -> ValidationResult {
    let mut reasons = Vec::new();

    let limit = capabilities.num_qubits as usize;
    if circuit.num_qubits() > limit {
        reasons.push(format!(
            "circuit uses {} qubits, backend has {limit}",
            circuit.num_qubits()
        ));
    }

    let rejected: std::collections::BTreeSet<&str> = circuit
        .instructions()
        .iter()
        .filter_map(|inst| inst.as_gate())
        .map(|gate| gate.name())
        .filter(|name| !capabilities.gate_set.contains(name))
        .collect();
    reasons.extend(rejected.into_iter().map(|name| format!("gate '{name}' is not supported")));

    let free = circuit.parameters();
    if !free.is_empty() {
        let free: Vec<String> = free.into_iter().collect();
        reasons.push(format!("unbound parameters: {}", free.join(", ")));
    }

    if reasons.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid { reasons }
    }
}

/// Construction from a [`BackendConfig`], used by the registry.
pub trait BackendFactory: Backend + Sized {
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_ir::{ParameterExpression, QubitId};

    #[test]
    fn test_extra_settings() {
        let config = BackendConfig::new("test")
            .with_extra("max_qubits", serde_json::json!(30))
            .with_extra("gate_set", serde_json::json!("ionq"));

        assert_eq!(config.extra_u64("max_qubits").unwrap(), Some(30));
        assert_eq!(config.extra_u64("seed").unwrap(), None);
        assert_eq!(config.extra_str("gate_set").unwrap(), Some("ionq"));
    }

    #[test]
    fn test_extra_wrong_type() {
        let config = BackendConfig::new("test").with_extra("seed", serde_json::json!("abc"));
        let err = config.extra_u64("seed").unwrap_err();
        assert!(err.to_string().contains("'seed' must be a non-negative integer"));
        assert!(matches!(config.extra_str("missing"), Ok(None)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = BackendConfig::new("test");
        config.token = Some("secret-token".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_availability() {
        let up = BackendAvailability::always_available();
        assert!(up.is_available);
        assert_eq!(up.queue_depth, Some(0));
        assert_eq!(up.estimated_wait, Some(Duration::ZERO));

        let down = BackendAvailability::unavailable("maintenance");
        assert!(!down.is_available);
        assert_eq!(down.status_message.as_deref(), Some("maintenance"));
    }

    #[test]
    fn test_check_circuit() {
        let caps = Capabilities::quantinuum("H1-1", 1);

        let mut ok = Circuit::with_size("ok", 1, 1);
        ok.rz(0.3, QubitId(0)).unwrap().rx(0.2, QubitId(0)).unwrap();
        ok.measure_all().unwrap();
        assert!(check_circuit(&caps, &ok).is_valid());

        let mut bad = Circuit::with_size("bad", 2, 0);
        bad.u(0.1, 0.2, 0.3, QubitId(0)).unwrap();
        bad.u(0.4, 0.5, 0.6, QubitId(1)).unwrap();
        bad.rz(ParameterExpression::symbol("x"), QubitId(1)).unwrap();
        let result = check_circuit(&caps, &bad);
        let reasons = result.reasons();
        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[1], "gate 'u' is not supported");
        assert!(reasons[2].contains("unbound parameters: x"));
    }
}
