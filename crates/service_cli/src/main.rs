//! Pricer CLI - theta-scheme finite-difference option pricing
//!
//! # Commands
//!
//! - `pricer price` - Price a European call or put (flags or `--interactive`)
//! - `pricer validate` - Compare the engine with the closed form on the benchmark table
//! - `pricer solver-check` - Report tridiagonal solver accuracy on manufactured systems
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires configuration,
//! logging and output formatting around the `pricer_pde` engine.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pricer_models::instruments::PayoffType;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod prompt;

pub use error::{CliError, Result};

use commands::price::PriceRequest;
use config::{CliConfig, OutputFormat};

/// Theta-scheme finite-difference option pricer
#[derive(Parser)]
#[command(name = "pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "pricer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European option
    Price(PriceArgs),

    /// Run the benchmark table against the closed form
    Validate {
        /// Output format (overrides the configuration)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Maximum absolute error (overrides the configuration)
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Solve manufactured tridiagonal systems and report errors as CSV
    SolverCheck {
        /// Write the CSV to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PriceArgs {
    /// Prompt for every input on stdin
    #[arg(
        short,
        long,
        conflicts_with_all = ["option", "spot", "strike", "maturity", "rate", "volatility"]
    )]
    interactive: bool,

    /// Option type: call or put
    #[arg(long, required_unless_present = "interactive")]
    option: Option<PayoffType>,

    /// Spot price S0
    #[arg(long, required_unless_present = "interactive")]
    spot: Option<f64>,

    /// Strike K
    #[arg(long, required_unless_present = "interactive")]
    strike: Option<f64>,

    /// Maturity T in years
    #[arg(long, required_unless_present = "interactive")]
    maturity: Option<f64>,

    /// Risk-free rate r
    #[arg(long, required_unless_present = "interactive", allow_negative_numbers = true)]
    rate: Option<f64>,

    /// Volatility sigma
    #[arg(long, required_unless_present = "interactive")]
    volatility: Option<f64>,

    /// Upper edge of the spot grid (default: multiplier x K)
    #[arg(long)]
    s_max: Option<f64>,

    /// Theta-scheme weight in [0, 1]
    #[arg(long)]
    theta: Option<f64>,

    /// Number of space nodes N
    #[arg(long)]
    space_steps: Option<usize>,

    /// Number of time steps M
    #[arg(long)]
    time_steps: Option<usize>,

    /// Estimate theta from the penultimate time layer
    #[arg(long)]
    compute_theta: bool,

    /// Output format (overrides the configuration)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

impl PriceArgs {
    fn into_request(self, settings: &CliConfig) -> Result<PriceRequest> {
        if self.interactive {
            let stdin = std::io::stdin();
            let mut request =
                prompt::collect(&mut stdin.lock(), &mut std::io::stdout(), settings)?;
            request.compute_theta = self.compute_theta;
            return Ok(request);
        }

        let missing = |name: &str| CliError::InvalidArgument(format!("--{} is required", name));
        Ok(PriceRequest {
            payoff_type: self.option.ok_or_else(|| missing("option"))?,
            spot: self.spot.ok_or_else(|| missing("spot"))?,
            strike: self.strike.ok_or_else(|| missing("strike"))?,
            maturity: self.maturity.ok_or_else(|| missing("maturity"))?,
            rate: self.rate.ok_or_else(|| missing("rate"))?,
            volatility: self.volatility.ok_or_else(|| missing("volatility"))?,
            s_max: self.s_max,
            theta: self.theta,
            space_steps: self.space_steps,
            time_steps: self.time_steps,
            compute_theta: self.compute_theta,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match CliConfig::load_with_env_and_validate(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("FATAL ERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // RUST_LOG wins over the configured level
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        settings.log_level.to_lowercase()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("FATAL ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, settings: &CliConfig) -> Result<()> {
    match command {
        Commands::Price(args) => {
            let format = args.format.unwrap_or(settings.output.format);
            let request = args.into_request(settings)?;
            commands::price::run(&request, format, settings)
        }
        Commands::Validate {
            format,
            tolerance,
            output,
        } => commands::validate::run(
            format.unwrap_or(settings.output.format),
            tolerance,
            output.as_deref(),
            settings,
        ),
        Commands::SolverCheck { output } => commands::solver_check::run(output.as_deref()),
    }
}
