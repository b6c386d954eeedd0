use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Report(args) => commands::handle_report(args, cli.config.as_deref(), cli.quiet, cli.verbose),
        Commands::Init { preset, path } => commands::handle_init(preset, path, cli.quiet),
        Commands::Config { show, validate } => {
            commands::handle_config(show, validate, cli.config.as_deref(), cli.quiet)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("RUST_LOG") {
        EnvFilter::new(env)
    } else if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
