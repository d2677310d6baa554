#![deny(missing_docs)]

//! # Generation Pipeline
//!
//! Drives `SchemaProvider` -> assembly -> `DocumentWriter`.
//!
//! - `OutputMode::Consolidated`: one document, all-or-nothing.
//! - `OutputMode::PerTable`: one document per table; failures are isolated and
//!   reported at the end. Destinations that differ only by case count as the
//!   same destination, so the later table fails.

use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::oas::document::{assemble, assemble_individual};
use crate::oas::models::{Diagnostic, DiagnosticLevel, Document};
use crate::provider::{is_valid_table_name, SchemaProvider};
use indexmap::IndexMap;
use std::collections::HashMap;

/// How documents are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// A single document covering every table.
    #[default]
    Consolidated,
    /// One self-contained document per table.
    PerTable,
}

/// Persists a document to a named destination.
///
/// The destination is opaque to the pipeline; implementations decide how it maps
/// to files, keys or anything else.
pub trait DocumentWriter {
    /// Writes `doc` to `destination`.
    fn write(&mut self, doc: &Document, destination: &str) -> AppResult<()>;
}

/// Collects documents in memory, keyed by destination.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    /// Written documents in write order.
    pub documents: IndexMap<String, Document>,
}

impl DocumentWriter for MemoryWriter {
    fn write(&mut self, doc: &Document, destination: &str) -> AppResult<()> {
        self.documents.insert(destination.to_string(), doc.clone());
        Ok(())
    }
}

/// A document that reached the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDocument {
    /// Source table, `None` for the consolidated document.
    pub table: Option<String>,
    /// Destination passed to the writer.
    pub destination: String,
}

/// A table that could not be generated in per-table mode.
#[derive(Debug)]
pub struct TableFailure {
    /// Table name.
    pub table: String,
    /// The error that stopped it.
    pub error: AppError,
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Documents written, in order.
    pub written: Vec<WrittenDocument>,
    /// Tables that failed (per-table mode only).
    pub failed: Vec<TableFailure>,
    /// Non-fatal notes, including skipped tables.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    /// True when no table failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the pipeline.
///
/// Lists tables once, skips names that are unsafe for paths, then assembles
/// and writes according to `mode`. An empty (or fully skipped) table list is
/// an `AppError::Document` in both modes.
pub fn run<P, W>(
    provider: &P,
    writer: &mut W,
    config: &GeneratorConfig,
    mode: OutputMode,
) -> AppResult<GenerationReport>
where
    P: SchemaProvider + ?Sized,
    W: DocumentWriter + ?Sized,
{
    let mut report = GenerationReport::default();

    let tables = select_tables(provider.list_tables()?, &mut report.diagnostics);
    if tables.is_empty() {
        return Err(AppError::Document("No valid tables to generate".into()));
    }
    tracing::info!(count = tables.len(), ?mode, "Generating API documents");

    match mode {
        OutputMode::Consolidated => {
            run_consolidated(provider, writer, config, &tables, &mut report)?
        }
        OutputMode::PerTable => run_per_table(provider, writer, config, &tables, &mut report),
    }

    Ok(report)
}

fn select_tables(tables: Vec<String>, diagnostics: &mut Vec<Diagnostic>) -> Vec<String> {
    let mut valid = Vec::with_capacity(tables.len());
    for table in tables {
        if is_valid_table_name(&table) {
            valid.push(table);
        } else {
            let diagnostic = Diagnostic::warning(
                table,
                "Skipped table with a name outside [A-Za-z0-9_]",
            );
            tracing::warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
        }
    }
    valid
}

fn run_consolidated<P, W>(
    provider: &P,
    writer: &mut W,
    config: &GeneratorConfig,
    tables: &[String],
    report: &mut GenerationReport,
) -> AppResult<()>
where
    P: SchemaProvider + ?Sized,
    W: DocumentWriter + ?Sized,
{
    let mut described = Vec::with_capacity(tables.len());
    for table in tables {
        let columns = provider.get_columns(table)?;
        tracing::debug!(table = %table, columns = columns.len(), "Fetched columns");
        described.push((table.clone(), columns));
    }

    let doc = assemble(&described, config)?;
    log_diagnostics(&doc.diagnostics);

    let destination = config.output.consolidated_name.clone();
    writer.write(&doc, &destination)?;
    tracing::info!(destination = %destination, "Wrote consolidated document");

    report.diagnostics.extend(doc.diagnostics);
    report.written.push(WrittenDocument {
        table: None,
        destination,
    });
    Ok(())
}

fn run_per_table<P, W>(
    provider: &P,
    writer: &mut W,
    config: &GeneratorConfig,
    tables: &[String],
    report: &mut GenerationReport,
) where
    P: SchemaProvider + ?Sized,
    W: DocumentWriter + ?Sized,
{
    let mut claimed: HashMap<String, &str> = HashMap::new();
    for table in tables {
        let destination = config.output.per_table_destination(table);
        let key = destination.to_lowercase();
        if let Some(owner) = claimed.get(&key) {
            let message = format!(
                "Destination '{}' collides with the document of table '{}'",
                destination, owner
            );
            let diagnostic = Diagnostic::warning(table.as_str(), message.as_str());
            tracing::warn!("{}", diagnostic);
            report.diagnostics.push(diagnostic);
            report.failed.push(TableFailure {
                table: table.clone(),
                error: AppError::Document(message),
            });
            continue;
        }
        claimed.insert(key, table);

        let result = provider
            .get_columns(table)
            .and_then(|columns| assemble_individual(table, &columns, config))
            .and_then(|doc| writer.write(&doc, &destination).map(|_| doc));

        match result {
            Ok(doc) => {
                tracing::info!(table = %table, destination = %destination, "Wrote table document");
                log_diagnostics(&doc.diagnostics);
                report.diagnostics.extend(doc.diagnostics);
                report.written.push(WrittenDocument {
                    table: Some(table.clone()),
                    destination,
                });
            }
            Err(error) => {
                tracing::error!(table = %table, %error, "Table generation failed");
                report.failed.push(TableFailure {
                    table: table.clone(),
                    error,
                });
            }
        }
    }
}

fn log_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic.level {
            DiagnosticLevel::Warning => tracing::warn!("{}", diagnostic),
            DiagnosticLevel::Info => tracing::info!("{}", diagnostic),
        }
    }
}
