//! dexmig CLI
//!
//! Moves a collectible-bot dataset from the legacy schema into the new one.
//!
//! # Commands
//!
//! - `export` - Write a source snapshot to an interchange file
//! - `import` - Load an interchange file into a target snapshot
//! - `inspect` - Summarize an interchange file without a store
//! - `catalog` - List the declared sections and tables

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// dexmig dataset transfer tool.
#[derive(Parser)]
#[command(name = "dexmig")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a source snapshot to an interchange file
    Export {
        /// Source snapshot (JSON)
        #[arg(short, long)]
        source: PathBuf,

        /// Interchange file to write; a `.gz` extension enables gzip
        #[arg(short, long, default_value = "migration.txt.gz")]
        out: PathBuf,
    },

    /// Import an interchange file into a target snapshot
    Import {
        /// Target snapshot (JSON); created when missing
        #[arg(short, long)]
        target: PathBuf,

        /// Interchange file to read
        #[arg(short, long, default_value = "migration.txt.gz")]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Retry a failed batch row by row instead of halting
        #[arg(long)]
        row_fallback: bool,

        /// Directory for the skipped-records and placeholder logs
        #[arg(long, default_value = ".")]
        log_dir: PathBuf,
    },

    /// Summarize an interchange file
    Inspect {
        /// Interchange file to read
        #[arg(short, long)]
        file: PathBuf,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the declared sections and tables
    Catalog,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Export { source, out } => {
            commands::export::run(&source, &out)?;
        }
        Commands::Import {
            target,
            file,
            yes,
            row_fallback,
            log_dir,
        } => {
            commands::import::run(&commands::import::ImportArgs {
                target,
                file,
                yes,
                row_fallback,
                log_dir,
            })?;
        }
        Commands::Inspect { file, format } => {
            commands::inspect::run(&file, &format)?;
        }
        Commands::Catalog => {
            commands::catalog::run()?;
        }
        Commands::Version => {
            println!("dexmig CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("dexmig core v{}", dexmig_core::TOOL_VERSION);
        }
    }

    Ok(())
}
