//! Sencillo CLI - offline host for the sencillo engines.

mod commands;
mod config;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sencillo")]
#[command(author, version, about = "Run sencillo audio engines over WAV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List engines, or show one engine's parameters
    Engines(commands::engines::EnginesArgs),

    /// Process a WAV file through an engine
    Process(commands::process::ProcessArgs),

    /// Print the wave-folded value of a single sample
    Fold(commands::fold::FoldArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Engines(args) => commands::engines::run(args),
        Commands::Process(args) => commands::process::run(args),
        Commands::Fold(args) => commands::fold::run(args),
    }
}
