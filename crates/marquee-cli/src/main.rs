//! Marquee CLI: the `marquee` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Eval {
            fixture,
            mode,
            loader_on_fetch,
            no_loader_on_fetch,
            config,
            json,
        } => commands::eval::run(commands::eval::Args {
            fixture,
            mode,
            loader_on_fetch: cli::flag_pair(loader_on_fetch, no_loader_on_fetch),
            config,
            json,
        }),

        Commands::Resolve { fixture, key, json } => commands::resolve::run(fixture, key, json),

        Commands::Active { fixture, json } => commands::active::run(fixture, json),
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
