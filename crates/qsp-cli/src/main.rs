//! QSP Workbench Command-Line Interface
//!
//! Build, verify and sample quantum signal processing sequences.
//!
//! ```text
//! qsp polynomial --phases 0.1,0.2,0.3,0.4
//! qsp unitary    --phases 0.1,0.2,0.3,0.4 --x 0.5
//! qsp verify     --phases 0.1,0.2,0.3,0.4 --points 21
//! qsp estimate   --phases 0,0 --x 0.5 --shots 1000
//! qsp sweep      --phases 0.1,0.2,0.3,0.4 --points 11 --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use qsp_core::PhaseSequence;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::OutputFormat;
use commands::{estimate, polynomial, sweep, targets, unitary, verify, version};

/// QSP Workbench - quantum signal processing from phases to shots
#[derive(Parser)]
#[command(name = "qsp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Workspace configuration file (YAML)
    #[arg(short, long, global = true, env = "QSP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the workspace targets
    Targets,

    /// Print the symbolic matrix entries of a phase sequence
    Polynomial {
        /// Comma-separated phases
        #[arg(short, long, allow_hyphen_values = true)]
        phases: PhaseSequence,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the unitary and circuit for one signal value
    Unitary {
        /// Comma-separated phases
        #[arg(short, long, allow_hyphen_values = true)]
        phases: PhaseSequence,

        /// Signal value
        #[arg(short, long, allow_negative_numbers = true)]
        x: f64,

        /// Also list the circuit gates
        #[arg(long)]
        circuit: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check the circuit against the numeric and symbolic products
    Verify {
        /// Comma-separated phases
        #[arg(short, long, allow_hyphen_values = true)]
        phases: PhaseSequence,

        /// Signal values to check
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "points")]
        xs: Option<Vec<f64>>,

        /// Number of evenly spaced signal values in [-1, 1]
        #[arg(long, default_value = "11")]
        points: usize,

        /// Largest accepted elementwise deviation
        #[arg(short, long, default_value_t = qsp_core::DEFAULT_TOLERANCE)]
        tolerance: f64,
    },

    /// Estimate P(0) for one signal value on a target
    Estimate {
        /// Comma-separated phases
        #[arg(short, long, allow_hyphen_values = true)]
        phases: PhaseSequence,

        /// Signal value
        #[arg(short, long, allow_negative_numbers = true)]
        x: f64,

        /// Number of shots (defaults to the workspace setting)
        #[arg(short, long)]
        shots: Option<u32>,

        /// Target name (defaults to the workspace default)
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Estimate P(0) across many signal values
    Sweep {
        /// Comma-separated phases
        #[arg(short, long, allow_hyphen_values = true)]
        phases: PhaseSequence,

        /// Signal values to sample
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "points")]
        xs: Option<Vec<f64>>,

        /// Number of evenly spaced signal values in [-1, 1]
        #[arg(long, default_value = "11")]
        points: usize,

        /// Number of shots per point (defaults to the workspace setting)
        #[arg(short, long)]
        shots: Option<u32>,

        /// Target name (defaults to the workspace default)
        #[arg(short, long)]
        target: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    // Execute command
    let result = match cli.command {
        Commands::Targets => targets::execute(config).await,

        Commands::Polynomial { phases, format } => polynomial::execute(&phases, format),

        Commands::Unitary {
            phases,
            x,
            circuit,
            format,
        } => unitary::execute(&phases, x, circuit, format),

        Commands::Verify {
            phases,
            xs,
            points,
            tolerance,
        } => verify::execute(&phases, xs, points, tolerance),

        Commands::Estimate {
            phases,
            x,
            shots,
            target,
        } => estimate::execute(config, &phases, x, shots, target.as_deref()).await,

        Commands::Sweep {
            phases,
            xs,
            points,
            shots,
            target,
            format,
        } => sweep::execute(config, &phases, xs, points, shots, target.as_deref(), format).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_phases_and_signal() {
        let cli = Cli::try_parse_from(["qsp", "unitary", "--phases", "-0.1,0.2", "--x", "-0.5"])
            .unwrap();
        match cli.command {
            Commands::Unitary { phases, x, .. } => {
                assert_eq!(phases.as_slice(), &[-0.1, 0.2]);
                assert_eq!(x, -0.5);
            }
            _ => panic!("expected unitary"),
        }
    }

    #[test]
    fn test_parse_sweep_xs() {
        let cli = Cli::try_parse_from([
            "qsp", "-vv", "sweep", "-p", "0,0", "--xs", "-1,0,0.5", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Sweep { xs, format, .. } => {
                assert_eq!(xs, Some(vec![-1.0, 0.0, 0.5]));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn test_xs_conflicts_with_points() {
        let parsed = Cli::try_parse_from([
            "qsp", "sweep", "-p", "0,0", "--xs", "0.1", "--points", "3",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_rejects_empty_phases() {
        assert!(Cli::try_parse_from(["qsp", "polynomial", "--phases", ""]).is_err());
        assert!(Cli::try_parse_from(["qsp", "polynomial", "--phases", "0.1,x"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["qsp", "targets", "--config", "ws.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ws.yaml")));
    }
}
