#![deny(missing_docs)]

//! # Tablespec CLI
//!
//! Command Line Interface for the schema-to-OpenAPI generator.
//!
//! Supported Commands:
//! - `generate`: Pipeline Schema -> Document Assembler -> OpenAPI files.
//! - `export-data`: Dumps table rows to one file per table plus metadata.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tablespec_core::AppResult;

mod export_data;
mod generate;
mod logging;
mod source;
mod writer;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Database schema to OpenAPI generator")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[clap(long, short, global = true)]
    verbose: bool,

    /// Dotenv file loaded before parsing environment-backed options.
    #[clap(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates OpenAPI documents from a schema source.
    Generate(generate::GenerateArgs),
    /// Exports table rows and an export metadata file.
    ExportData(export_data::ExportDataArgs),
}

fn main() -> AppResult<()> {
    // Environment-backed flags must see the dotenv values, so load before parsing.
    load_env_file(&env_file_arg());

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    tracing::debug!(env_file = ?cli.env_file, "Environment loaded");

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::ExportData(args) => export_data::execute(args)?,
    }

    Ok(())
}

/// Finds `--env-file` ahead of clap, which needs the environment already populated.
fn env_file_arg() -> PathBuf {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--env-file=") {
            return PathBuf::from(value);
        }
        if arg == "--env-file" {
            if let Some(value) = args.next() {
                return PathBuf::from(value);
            }
        }
    }
    PathBuf::from(".env")
}

fn load_env_file(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => {}
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Warning: could not load {:?}: {}", path, e),
    }
}
