#![deny(missing_docs)]

//! # Schema Sources
//!
//! Loads a `StaticProvider` from a file, picking the parser by extension:
//! `.rs` is a Diesel schema, `.json` a JSON manifest, anything else a YAML manifest.

use std::fs;
use std::path::Path;
use tablespec_core::{parse_diesel_schema, AppError, AppResult, SchemaManifest, StaticProvider};

/// Reads and parses the schema source at `path`.
pub fn load_provider(path: &Path) -> AppResult<StaticProvider> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Provider(format!("Cannot read schema source {:?}: {}", path, e))
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let provider = match extension.as_deref() {
        Some("rs") => parse_diesel_schema(&content)?,
        Some("json") => SchemaManifest::from_json_str(&content)?.into_provider()?,
        _ => SchemaManifest::from_yaml_str(&content)?.into_provider()?,
    };

    tracing::debug!(path = ?path, "Loaded schema source");
    Ok(provider)
}
