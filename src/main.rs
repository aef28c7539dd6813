//! Kiln - an asset build pipeline.

use clap::{ColorChoice, Parser};
use kiln::cli::{Cli, Commands, build};
use kiln::config::KilnConfig;
use kiln::log;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    if let Err(err) = run(&cli) {
        log!("error"; "{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = KilnConfig::load(cli)?;

    match &cli.command {
        Commands::Build { .. } => build::build_project(&config),
        Commands::Clean { .. } => build::clean_output(&config),
    }
}
