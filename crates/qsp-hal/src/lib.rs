//! Execution layer of the QSP workbench.
//!
//! Circuits run on a [`Backend`]. Backends are built by kind through a
//! [`BackendRegistry`] and grouped into a [`Workspace`] of named targets
//! described by a [`WorkspaceConfig`]. A run returns [`Counts`] inside an
//! [`ExecutionResult`].
//!
//! ```ignore
//! use qsp_hal::{BackendRegistry, Workspace, WorkspaceConfig};
//! use qsp_adapter_sim::register_all;
//!
//! # async fn demo(circuit: qsp_ir::Circuit) -> anyhow::Result<()> {
//! let mut registry = BackendRegistry::new();
//! register_all(&mut registry);
//!
//! let config = WorkspaceConfig::load(Some("workspace.yaml".as_ref()), WorkspaceConfig::default())?;
//! let workspace = Workspace::connect(config, &registry)?;
//!
//! let result = workspace.run(&circuit, Some(1000), None).await?;
//! println!("P(0) = {}", result.counts.probability("0"));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod capability;
pub mod config;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;
pub mod workspace;

pub use backend::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, DEFAULT_POLL_INTERVAL,
    ValidationResult, check_circuit,
};
pub use capability::{Capabilities, GateSet};
pub use config::{ConfigError, TargetConfig, WorkspaceConfig};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
pub use workspace::Workspace;
