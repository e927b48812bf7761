//! ssg CLI - Site graph builder.
//!
//! Provides commands for:
//! - `graph`: Print every file's path and data bag as JSON
//! - `tree`: Print the section tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GraphArgs, TreeArgs};
use output::Output;

/// ssg - Site graph builder.
#[derive(Parser)]
#[command(name = "ssg", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the site graph as JSON.
    Graph(GraphArgs),
    /// Print the section tree.
    Tree(TreeArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Graph(args) => args.site.verbose,
            Self::Tree(args) => args.site.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Graph(args) => args.execute(),
        Commands::Tree(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
