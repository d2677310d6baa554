#![deny(missing_docs)]

//! # Tablespec Core
//!
//! Core library for the schema-to-OpenAPI generator.
//!
//! Pipeline: `SchemaProvider` -> Type Mapper -> Schema / Path Builders ->
//! Document Assembler -> `DocumentWriter`.

/// Shared error types.
pub mod error;

/// Generator configuration.
pub mod config;

/// Type mapping logic (SQL -> OpenAPI).
pub mod type_mapping;

/// Schema providers (manifest files, Diesel schemas).
pub mod provider;

/// OpenAPI document generation.
pub mod oas;

/// Provider -> assembler -> writer driver.
pub mod pipeline;

/// Table contents export.
pub mod data_export;

pub use config::{ApiInfo, GeneratorConfig, ListOptions, OutputOptions, ServerInfo};
pub use data_export::{
    export_data, table_records, ExportMetadata, ExportReport, Record, RecordWriter,
    TableExportEntry,
};
pub use error::{AppError, AppResult};
pub use oas::{
    assemble, assemble_individual, build_paths, build_schema, create_schema, error_schema,
    render_document, validate_document, Diagnostic, DiagnosticLevel, Document, SchemaObject,
};
pub use pipeline::{
    run, DocumentWriter, GenerationReport, MemoryWriter, OutputMode, TableFailure,
    WrittenDocument,
};
pub use provider::{
    is_valid_table_name, parse_diesel_schema, ColumnDescriptor, RowProvider, SchemaManifest,
    SchemaProvider, StaticProvider,
};
pub use type_mapping::{map_type, SqlTypeMapper, TypeDescriptor, TypeKind, TypeMapper};
