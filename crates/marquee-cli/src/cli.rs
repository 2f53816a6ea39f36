use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "marquee",
    about = "Marquee: evaluate multi-source loading verdicts over captured source snapshots",
    version
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate every query in a fixture into one verdict
    Eval {
        /// Path to fixture JSON (`{"queries": [...]}`)
        fixture: String,

        /// Evaluator style (defaults to the config file, then `render`)
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Show the loader during fetches while some source has no data
        #[arg(long, overrides_with = "no_loader_on_fetch")]
        loader_on_fetch: bool,

        /// Validate cached data during fetches, even if the config enables the loader
        #[arg(long, overrides_with = "loader_on_fetch")]
        no_loader_on_fetch: bool,

        /// Path to marquee.toml (default: ./marquee.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a single query of a fixture against its schema
    Resolve {
        /// Path to fixture JSON
        fixture: String,

        /// Key of the query to resolve
        #[arg(long)]
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the queries that take part in an evaluation
    Active {
        /// Path to fixture JSON
        fixture: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeArg {
    /// Return failures as a directive
    #[default]
    #[value(name = "render")]
    Render,
    /// Raise failures to an enclosing error boundary
    #[value(name = "throw")]
    Throw,
}

/// Resolve a `--flag` / `--no-flag` pair; `None` when neither was given.
pub fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl ModeArg {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeArg::Render => "render",
            ModeArg::Throw => "throw",
        }
    }
}
