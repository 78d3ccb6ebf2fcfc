mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{catchment, classify, map, presets, represent};

/// Log to stderr at a level picked by `-v` count; `RUST_LOG` overrides.
fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Catchment(args) => catchment::run(&cli, args),
        Commands::Classify(args) => classify::run(&cli, args),
        Commands::Map(args) => map::run(&cli, args),
        Commands::Presets(args) => presets::run(&cli, args),
        Commands::Represent(args) => represent::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
