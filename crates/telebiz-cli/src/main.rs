//! Telebiz CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use telebiz_cli::cli::Cli;
use telebiz_cli::commands;

fn main() {
    // Working-directory .env.local first, then the config directory's
    let _ = dotenvy::from_filename(".env.local");
    telebiz_core::config::load_env();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
