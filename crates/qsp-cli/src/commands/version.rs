//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum signal processing from phases to shots",
        style("QSP Workbench").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsp-ir           Circuit intermediate representation");
    println!("  qsp-hal          Backends, workspace and configuration");
    println!("  qsp-core         QSP products, circuits and estimates");
    println!("  qsp-adapter-sim  Local simulator and API validator");
    println!("  qsp-cli          Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/hiq-lab/qsp-workbench").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
