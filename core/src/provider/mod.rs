#![deny(missing_docs)]

//! # Schema Providers
//!
//! The boundary between the generator and whatever knows the database layout.
//!
//! - **SchemaProvider**: lists tables and their column descriptors.
//! - **RowProvider**: fetches table contents for data export.
//! - **manifest**: YAML/JSON schema manifests loaded into a `StaticProvider`.
//! - **diesel**: parser for Diesel `table!` schema files.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

pub mod diesel;
pub mod manifest;

pub use diesel::parse_diesel_schema;
pub use manifest::{SchemaManifest, TableManifest};

/// Metadata for one physical column, as reported by a schema provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Native database type, e.g. `varchar(100)` or `Int4`.
    #[serde(rename = "type", alias = "native_type")]
    pub native_type: String,
    /// Whether the column accepts NULL.
    #[serde(default)]
    pub nullable: bool,
    /// Declared maximum length, if the provider knows it.
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Whether the column is part of the primary key.
    #[serde(default, rename = "primary_key", alias = "is_primary_key")]
    pub is_primary_key: bool,
    /// Column default, if any.
    #[serde(default)]
    pub default: Option<Value>,
    /// Documentation comment attached to the column.
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a NOT NULL column without default.
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            nullable: false,
            max_length: None,
            is_primary_key: false,
            default: None,
            comment: None,
        }
    }

    /// Marks the column as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Sets the declared maximum length.
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the column default.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the documentation comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Source of table names and column metadata.
///
/// Calls are synchronous. Failures are reported as `AppError::Provider` and are
/// never retried by the generator.
pub trait SchemaProvider {
    /// Returns the table names in a stable order.
    fn list_tables(&self) -> AppResult<Vec<String>>;

    /// Returns the columns of `table` in their physical order.
    fn get_columns(&self, table: &str) -> AppResult<Vec<ColumnDescriptor>>;
}

/// Source of table contents for the data export.
pub trait RowProvider {
    /// Returns every row of `table`, keyed by column name.
    fn fetch_rows(&self, table: &str) -> AppResult<Vec<IndexMap<String, Value>>>;
}

/// Checks that a table name is safe to use in paths and file names.
pub fn is_valid_table_name(name: &str) -> bool {
    static TABLE_NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = TABLE_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid regex"));
    re.is_match(name)
}

#[derive(Debug, Clone, Default, PartialEq)]
struct StaticTable {
    columns: Vec<ColumnDescriptor>,
    rows: Vec<IndexMap<String, Value>>,
}

/// An in-memory provider. Built from manifests, Diesel schemas, or by hand in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticProvider {
    database: Option<String>,
    tables: IndexMap<String, StaticTable>,
}

impl StaticProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database name reported in export metadata.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Adds (or replaces) a table definition. Tables keep insertion order.
    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        self.tables.entry(name.into()).or_default().columns = columns;
        self
    }

    /// Attaches rows to a table, creating it without columns if absent.
    pub fn with_rows(
        mut self,
        name: impl Into<String>,
        rows: Vec<IndexMap<String, Value>>,
    ) -> Self {
        self.tables.entry(name.into()).or_default().rows = rows;
        self
    }

    /// The database name, when known.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn table(&self, name: &str) -> AppResult<&StaticTable> {
        self.tables
            .get(name)
            .ok_or_else(|| AppError::Provider(format!("Table '{}' not found", name)))
    }
}

impl SchemaProvider for StaticProvider {
    fn list_tables(&self) -> AppResult<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn get_columns(&self, table: &str) -> AppResult<Vec<ColumnDescriptor>> {
        Ok(self.table(table)?.columns.clone())
    }
}

impl RowProvider for StaticProvider {
    fn fetch_rows(&self, table: &str) -> AppResult<Vec<IndexMap<String, Value>>> {
        Ok(self.table(table)?.rows.clone())
    }
}
