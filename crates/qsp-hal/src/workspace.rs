//! Workspace client.
//!
//! A [`Workspace`] is a connected set of named targets, built once from a
//! [`WorkspaceConfig`] and a [`BackendRegistry`] and then passed to
//! whatever needs to run circuits.

use std::collections::BTreeMap;
use std::sync::Arc;

use qsp_ir::Circuit;
use tracing::{debug, info, instrument};

use crate::backend::Backend;
use crate::config::WorkspaceConfig;
use crate::error::{HalError, HalResult};
use crate::registry::BackendRegistry;
use crate::result::ExecutionResult;

/// A connected workspace.
pub struct Workspace {
    config: WorkspaceConfig,
    targets: BTreeMap<String, Arc<dyn Backend>>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("config", &self.config)
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Workspace {
    /// Connect to a workspace.
    ///
    /// Identity and location must be set. Every configured target is
    /// created through `registry`; the first failure aborts the connect.
    pub fn connect(config: WorkspaceConfig, registry: &BackendRegistry) -> HalResult<Self> {
        config.validate()?;

        let identity = config
            .identity
            .as_deref()
            .ok_or_else(|| HalError::Configuration("workspace identity is not set".into()))?;
        let location = config
            .location
            .as_deref()
            .ok_or_else(|| HalError::Configuration("workspace location is not set".into()))?;

        let mut targets = BTreeMap::new();
        for (name, target) in &config.targets {
            let kind = target.kind(name);
            debug!("Creating target '{}' from backend kind '{}'", name, kind);
            let backend = registry.create(kind, target.backend_config(name))?;
            targets.insert(name.clone(), Arc::from(backend));
        }

        info!(
            "Connected to workspace '{}' in '{}' with {} target(s)",
            identity,
            location,
            targets.len()
        );

        Ok(Self { config, targets })
    }

    /// The configuration this workspace was connected with.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Names of all targets, sorted.
    pub fn list_targets(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    /// Look up a target by name.
    pub fn target(&self, name: &str) -> HalResult<Arc<dyn Backend>> {
        self.targets
            .get(name)
            .cloned()
            .ok_or_else(|| HalError::UnknownTarget(name.to_string()))
    }

    /// The configured default target.
    pub fn default_target(&self) -> HalResult<Arc<dyn Backend>> {
        let name = self
            .config
            .default_target
            .as_deref()
            .ok_or(HalError::NoDefaultTarget)?;
        self.target(name)
    }

    /// Resolve `target`, falling back to the default.
    pub fn resolve(&self, target: Option<&str>) -> HalResult<Arc<dyn Backend>> {
        match target {
            Some(name) => self.target(name),
            None => self.default_target(),
        }
    }

    /// Submit `circuit` and wait for its result.
    ///
    /// `shots` falls back to the configured default. The wait uses the
    /// configured poll interval and, if set, the configured timeout.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub async fn run(
        &self,
        circuit: &Circuit,
        shots: Option<u32>,
        target: Option<&str>,
    ) -> HalResult<ExecutionResult> {
        let backend = self.resolve(target)?;
        let shots = shots.unwrap_or(self.config.default_shots);

        let job_id = backend.submit(circuit, shots).await?;
        debug!("Submitted job {} to {}", job_id, backend.name());

        match self.config.timeout() {
            Some(timeout) => {
                backend
                    .wait_timeout(&job_id, self.config.poll_interval(), timeout)
                    .await
            }
            None => backend.wait_polling(&job_id, self.config.poll_interval()).await,
        }
    }
}
