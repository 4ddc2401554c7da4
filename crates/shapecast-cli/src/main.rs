//! # shapecast CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shapecast_cli::check::run_check;
use shapecast_cli::transform::{run_decode, run_encode, TransformArgs};
use shapecast_cli::Options;

/// shapecast — schema-driven JSON decoding and encoding.
///
/// Validates JSON documents against a registry of named descriptors,
/// renaming keys and normalizing timestamps in either direction.
#[derive(Parser, Debug)]
#[command(name = "shapecast", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Registry file or directory (JSON/YAML). Defaults to the bundled
    /// launch list registry.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Root schema name. Defaults to LaunchPage with the bundled registry.
    #[arg(long, global = true)]
    root: Option<String>,

    /// Print single-line JSON.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode an external JSON document into its typed form.
    Decode(TransformArgs),

    /// Encode a typed JSON document back into its external form.
    Encode(TransformArgs),

    /// List registered schemas and report dangling refs.
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("shapecast CLI starting");

    let opts = Options {
        registry: cli.registry,
        root: cli.root,
        compact: cli.compact,
    };

    let result = match cli.command {
        Commands::Decode(args) => run_decode(&args, &opts),
        Commands::Encode(args) => run_encode(&args, &opts),
        Commands::Check => run_check(&opts),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
