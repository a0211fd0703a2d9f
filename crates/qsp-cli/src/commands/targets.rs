//! Targets command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use super::common::connect;

/// Execute the targets command.
pub async fn execute(config: Option<&Path>) -> Result<()> {
    let workspace = connect(config)?;
    let settings = workspace.config();

    println!(
        "{} Workspace {} ({})\n",
        style("QSP").cyan().bold(),
        style(settings.identity.as_deref().unwrap_or("-")).bold(),
        settings.location.as_deref().unwrap_or("-")
    );

    for name in workspace.list_targets() {
        let backend = workspace.target(&name)?;
        let caps = backend.capabilities();
        let available = backend.availability().await.is_ok_and(|a| a.is_available);
        let is_default = settings.default_target.as_deref() == Some(name.as_str());

        println!(
            "  {} {}{}",
            if available {
                style("●").green()
            } else {
                style("○").red()
            },
            style(&name).bold(),
            if is_default { " (default)" } else { "" }
        );
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        println!(
            "    Gates: {}",
            caps.gate_set
                .single_qubit
                .iter()
                .chain(&caps.gate_set.two_qubit)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    Ok(())
}
