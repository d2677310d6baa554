#![deny(missing_docs)]

//! # Export Data Command
//!
//! Writes one file per table holding its rows, then `export_metadata.{ext}`.

use crate::source::load_provider;
use crate::writer::{FileWriter, OutputFormat};
use std::path::PathBuf;
use tablespec_core::{export_data, AppError, AppResult};

/// Arguments for the export-data command.
#[derive(clap::Args, Debug, Clone)]
pub struct ExportDataArgs {
    /// Schema manifest holding table rows (.yaml/.yml/.json).
    #[clap(long, env = "TABLESPEC_SCHEMA")]
    pub schema: PathBuf,

    /// Output directory for data files.
    #[clap(long, default_value = "exports/data", env = "TABLESPEC_DATA_DIR")]
    pub output_dir: PathBuf,

    /// Output file format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Database name recorded in the metadata. Defaults to the manifest's.
    #[clap(long)]
    pub database: Option<String>,
}

/// Executes the data export.
pub fn execute(args: &ExportDataArgs) -> AppResult<()> {
    let provider = load_provider(&args.schema)?;
    let database = args
        .database
        .clone()
        .or_else(|| provider.database().map(String::from));
    let export_date = chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string();

    println!(
        "Exporting table data from {:?} into {:?}...",
        args.schema, args.output_dir
    );
    let mut writer = FileWriter::new(&args.output_dir, args.format);
    let report = export_data(&provider, &mut writer, database, &export_date)?;

    for entry in &report.metadata.tables {
        println!("  - {} ({} records)", entry.file, entry.records);
    }
    for table in &report.skipped {
        println!("  ! Skipped invalid table name '{}'", table);
    }
    for (table, error) in &report.failed {
        eprintln!("  x {}: {}", table, error);
    }
    println!(
        "Exported {} record(s) from {} table(s).",
        report.metadata.total_records, report.metadata.total_tables
    );

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::General(format!(
            "{} table(s) failed to export",
            report.failed.len()
        )))
    }
}
