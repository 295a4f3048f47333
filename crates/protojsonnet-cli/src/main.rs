//! protojsonnet CLI
//!
//! Read-only views over the resolved type model of a descriptor set:
//! - `types`: every registered message and enum
//! - `meta`: field metadata and one-of groups of one message
//! - `tree`: the package namespace tree
//! - `diagnostics`: what was ignored while loading

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

mod inspect;

#[derive(Parser)]
#[command(name = "protojsonnet")]
#[command(
    author,
    version,
    about = "Inspect the resolved type model of a protobuf descriptor set"
)]
struct Cli {
    /// Log debug output (map promotion, unresolved references) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Clone)]
pub struct InputArgs {
    /// Descriptor set JSON (`buf build --as-file-descriptor-set`), or `-` for stdin.
    pub descriptor: PathBuf,
    /// Ignore protoc-gen-validate options entirely.
    #[arg(long)]
    pub skip_validation: bool,
    /// Write the output here instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered types in qualified-name order.
    Types {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Field metadata and one-of groups for a message.
    Meta {
        #[command(flatten)]
        input: InputArgs,
        /// Qualified message name (e.g. `acme.v1.Order`).
        message: String,
    },
    /// Package namespace tree with top-level types as leaves.
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Malformed extensions and unresolved list elements or map entries.
    Diagnostics {
        #[command(flatten)]
        input: InputArgs,
        /// Print JSON instead of one line per diagnostic.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Types { input } => inspect::cmd_types(&input),
        Commands::Meta { input, message } => inspect::cmd_meta(&input, &message),
        Commands::Tree { input } => inspect::cmd_tree(&input),
        Commands::Diagnostics { input, json } => inspect::cmd_diagnostics(&input, json),
    }
}
