//! LightNet CLI - Interactive shell for beacon and fibre networks
//!
//! Runs commands against an in-memory [`lightnet::LightNetwork`], either
//! typed at a prompt or read from a script file.

mod commands;
mod config;
mod output;
mod repl;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::OutputHandler;

/// LightNet CLI - beacon and fibre network shell
#[derive(Parser)]
#[command(name = "lightnet")]
#[command(author = "LightNet Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive shell for beacon and fibre networks")]
#[command(long_about = r#"
LightNet keeps colored beacons linked by light beams and a network of
weighted fibres between cross-points, and answers queries over both.

Examples:
  lightnet                          # Start an interactive shell
  lightnet --script demo.lnet       # Run commands from a file
  lightnet --script demo.lnet --json
  lightnet config --init            # Write the default config file
"#)]
struct Cli {
    /// Configuration file (defaults to ~/.lightnet/config.toml)
    #[arg(short, long, env = "LIGHTNET_CONFIG")]
    config: Option<PathBuf>,

    /// Run commands from a file instead of the interactive shell
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print replies as JSON
    #[arg(long)]
    json: bool,

    /// Seed for random_add, overriding the configuration
    #[arg(long, env = "LIGHTNET_SEED")]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(config::Config::config_path);
    let mut config = config::Config::load_from(&config_path)?;
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.session.log_level.as_str()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lightnet={0},lightnet_cli={0},warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Config { init }) => {
            let output = OutputHandler::new(config.display.colors, false);
            if init {
                config.save_to(&config_path)?;
                output.print_success(&format!("Wrote {}", config_path.display()));
            } else {
                output.print_info(&format!("Config file: {}", config_path.display()));
                println!("{}", config.to_toml()?);
            }
        }
        None => {
            let mut repl = repl::LightNetRepl::new(config, cli.json);
            match cli.script {
                Some(path) => repl.run_script(&path)?,
                None => repl.run()?,
            }
        }
    }

    Ok(())
}
