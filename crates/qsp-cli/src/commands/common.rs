//! Shared helpers for CLI commands.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use qsp_adapter_sim::{API_VALIDATOR_KIND, SIMULATOR_KIND, register_all};
use qsp_core::signal_grid;
use qsp_hal::{BackendRegistry, TargetConfig, Workspace, WorkspaceConfig};
use qsp_ir::Unitary2x2;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// Workspace used when no configuration file is given.
pub fn local_config() -> WorkspaceConfig {
    let mut config = WorkspaceConfig {
        identity: Some("local".into()),
        location: Some("local".into()),
        default_target: Some("simulator".into()),
        ..WorkspaceConfig::default()
    };
    config
        .targets
        .insert("simulator".into(), TargetConfig::of_kind(SIMULATOR_KIND));
    config
        .targets
        .insert("quantinuum.sim".into(), TargetConfig::of_kind(API_VALIDATOR_KIND));
    config
}

/// Load the workspace configuration, falling back to [`local_config`].
pub fn load_config(path: Option<&Path>) -> Result<WorkspaceConfig> {
    if let Some(path) = path {
        debug!("Loading workspace configuration from {}", path.display());
    }
    WorkspaceConfig::load(path, local_config()).with_context(|| match path {
        Some(path) => format!("Failed to load configuration: {}", path.display()),
        None => "Invalid workspace configuration".to_string(),
    })
}

/// Connect to the configured workspace with the local backends registered.
pub fn connect(path: Option<&Path>) -> Result<Workspace> {
    let config = load_config(path)?;
    let mut registry = BackendRegistry::new();
    register_all(&mut registry);
    Ok(Workspace::connect(config, &registry)?)
}

/// Signal values from `--xs`, or an even grid of `points`.
pub fn signal_values(xs: Option<Vec<f64>>, points: usize) -> Result<Vec<f64>> {
    let xs = xs.unwrap_or_else(|| signal_grid(points));
    if xs.is_empty() {
        anyhow::bail!("No signal values given");
    }
    Ok(xs)
}

/// A cyan spinner with `message`.
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Print a 2x2 matrix, indented.
pub fn print_unitary(u: &Unitary2x2) {
    for line in u.to_string().lines() {
        println!("    {line}");
    }
}

/// Print `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Header line shared by most commands.
pub fn print_header(action: &str, detail: impl std::fmt::Display) {
    println!(
        "{} {} {}",
        style("→").cyan().bold(),
        action,
        style(detail).green()
    );
}
