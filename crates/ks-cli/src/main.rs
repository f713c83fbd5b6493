//! kakuhen — terminal front-end and batch simulator for the Kakuhen slot
//!
//! Usage:
//!   kakuhen play [--seed N] [--profile turbo]
//!   kakuhen simulate --spins 100000 --seed 7 --json
//!   kakuhen config --format yaml

mod play;
mod render;
mod simulate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use ks_slot::SlotConfig;

#[derive(Parser)]
#[command(name = "kakuhen")]
#[command(about = "Kakuhen slot machine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively in the terminal
    Play(play::PlayArgs),

    /// Run a headless batch of spins and print session statistics
    Simulate(simulate::SimulateArgs),

    /// Print the default configuration
    Config {
        #[arg(long, value_enum, default_value_t = ConfigFormat::Json)]
        format: ConfigFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConfigFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Simulate(args) => simulate::run(args),
        Commands::Config { format } => print_default_config(format),
    }
}

/// Load a configuration file, or the defaults when none is given
fn load_config(path: Option<&Path>) -> Result<SlotConfig> {
    match path {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SlotConfig::default()),
    }
}

fn print_default_config(format: ConfigFormat) -> Result<()> {
    let config = SlotConfig::default();
    let text = match format {
        ConfigFormat::Json => config.to_json(),
        ConfigFormat::Yaml => config.to_yaml(),
    }
    .context("Failed to encode config")?;
    println!("{text}");
    Ok(())
}
