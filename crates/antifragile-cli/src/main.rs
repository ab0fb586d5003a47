mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::correlation::CorrelationArgs;
use commands::dashboard::DashboardArgs;
use commands::sensitivity::SensitivityArgs;
use commands::simulate::SimulateArgs;

/// Crisis-scenario portfolio explorer
#[derive(Parser)]
#[command(
    name = "afx",
    version,
    about = "Crisis-scenario portfolio explorer",
    long_about = "A CLI for simulating asset classes under macro-crisis scenarios \
                  (war in Ukraine, energy crisis, climate change, tariff war) and \
                  measuring how an allocation behaves as the crisis escalates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log pipeline events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full dashboard: portfolio vs benchmark, correlations, antifragility index
    Dashboard(DashboardArgs),
    /// Simulate the per-asset index series of a scenario
    Simulate(SimulateArgs),
    /// Correlation matrix of the simulated asset classes
    Correlation(CorrelationArgs),
    /// Antifragility index and returns for every intensity from 1 to 10
    Sensitivity(SensitivityArgs),
    /// List the crisis scenarios with their drift tables and recommendations
    Scenarios,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = if verbose {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Dashboard(args) => commands::dashboard::run_dashboard(args),
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Correlation(args) => commands::correlation::run_correlation(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Scenarios => commands::scenarios::run_scenarios(),
        Commands::Version => {
            println!("afx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
