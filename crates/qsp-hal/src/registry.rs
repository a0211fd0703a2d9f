//! Backend kinds by name.
//!
//! A [`BackendRegistry`] maps the `backend` field of a target
//! configuration to a constructor, which is how a workspace turns its
//! configured targets into live backends.

use std::collections::BTreeMap;

use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

type Constructor = Box<dyn Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync>;

#[derive(Default)]
pub struct BackendRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `B` under `kind`, built with [`BackendFactory::from_config`].
    pub fn register<B>(&mut self, kind: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        self.register_factory(kind, |config| {
            B::from_config(config).map(|b| Box::new(b) as Box<dyn Backend>)
        });
    }

    /// Register an arbitrary constructor under `kind`.
    pub fn register_factory(
        &mut self,
        kind: impl Into<String>,
        constructor: impl Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let kind = kind.into();
        debug!(%kind, "registering backend kind");
        self.constructors.insert(kind, Box::new(constructor));
    }

    pub fn create(&self, kind: &str, config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        let constructor = self.constructors.get(kind).ok_or_else(|| {
            HalError::BackendUnavailable(format!("no backend kind '{kind}' is registered"))
        })?;
        constructor(config)
    }

    /// Registered kinds in sorted order.
    pub fn available_backends(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn has_backend(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }
}
