#![deny(missing_docs)]

//! # File Writer
//!
//! Filesystem implementation of the core `DocumentWriter` and `RecordWriter`
//! traits. Destinations become `{dir}/{destination}.{yaml|json}`.
//!
//! A writer refuses to write the same file twice, comparing names without case,
//! and never writes table records over the export summary.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tablespec_core::{
    render_document, AppError, AppResult, Document, DocumentWriter, ExportMetadata, Record,
    RecordWriter,
};

/// File name (without extension) of the export summary.
pub const EXPORT_METADATA_NAME: &str = "export_metadata";

/// Serialization format of written files.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// YAML (`.yaml`).
    #[default]
    Yaml,
    /// Pretty-printed JSON (`.json`).
    Json,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }

    /// Serializes `value` in this format.
    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> AppResult<String> {
        match self {
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .map_err(|e| AppError::General(format!("YAML serialization failed: {}", e))),
            OutputFormat::Json => serde_json::to_string_pretty(value)
                .map(|s| s + "\n")
                .map_err(|e| AppError::General(format!("JSON serialization failed: {}", e))),
        }
    }
}

/// Writes documents and records below a directory.
#[derive(Debug, Clone)]
pub struct FileWriter {
    dir: PathBuf,
    format: OutputFormat,
    written: Vec<PathBuf>,
    claimed: HashSet<String>,
}

impl FileWriter {
    /// Creates a writer. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            written: Vec::new(),
            claimed: HashSet::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a destination, e.g. `users_api.yaml`.
    pub fn file_name(&self, destination: &str) -> String {
        format!("{}.{}", destination, self.format.extension())
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Serializes `value` to `{dir}/{destination}.{ext}` and returns the path.
    pub fn write_value<T: Serialize + ?Sized>(
        &mut self,
        destination: &str,
        value: &T,
    ) -> AppResult<PathBuf> {
        if destination.is_empty() || destination.contains(['/', '\\']) || destination == ".." {
            return Err(AppError::General(format!(
                "Invalid output name '{}'",
                destination
            )));
        }

        let file_name = self.file_name(destination);
        if !self.claimed.insert(file_name.to_lowercase()) {
            return Err(AppError::General(format!(
                "'{}' was already written in this run",
                file_name
            )));
        }

        let content = self.format.serialize(value)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "Wrote file");
        self.written.push(path.clone());
        Ok(path)
    }
}

impl DocumentWriter for FileWriter {
    fn write(&mut self, doc: &Document, destination: &str) -> AppResult<()> {
        self.write_value(destination, &render_document(doc))?;
        Ok(())
    }
}

impl RecordWriter for FileWriter {
    fn write_records(&mut self, table: &str, records: &[Record]) -> AppResult<String> {
        if table.eq_ignore_ascii_case(EXPORT_METADATA_NAME) {
            return Err(AppError::General(format!(
                "Table '{}' would overwrite the export summary",
                table
            )));
        }
        self.write_value(table, records)?;
        Ok(self.file_name(table))
    }

    fn write_metadata(&mut self, metadata: &ExportMetadata) -> AppResult<()> {
        self.write_value(EXPORT_METADATA_NAME, &metadata.to_value()?)?;
        Ok(())
    }
}

/// Builds the `api_index` document listing per-table files.
pub fn api_index(
    title: &str,
    version: &str,
    generated_at: &str,
    apis: &IndexMap<String, String>,
    failed: &[String],
) -> Value {
    serde_json::json!({
        "api_index": {
            "title": title,
            "version": version,
            "generated_at": generated_at,
            "total_apis": apis.len(),
            "apis": apis,
            "failed": failed,
        }
    })
}
