#![deny(missing_docs)]

//! # Document Assembly
//!
//! Folds the per-table builder outputs into complete documents.
//!
//! - `assemble`: one consolidated document for many tables.
//! - `assemble_individual`: one self-contained document for a single table.
//!
//! Both run the same builders and the same validation, and perform no I/O.

use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::oas::models::{Document, PathItem, SchemaObject};
use crate::oas::routes::build_paths;
use crate::oas::schemas::{build_schema, create_schema, error_schema};
use crate::oas::validation::validate_document;
use crate::provider::ColumnDescriptor;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Assembles one document covering every table, in input order.
///
/// Fails with `AppError::Document` on an empty table set or on colliding
/// schema names / operation ids, and with `AppError::Schema` when a table has
/// no usable columns.
pub fn assemble(
    tables: &[(String, Vec<ColumnDescriptor>)],
    config: &GeneratorConfig,
) -> AppResult<Document> {
    if tables.is_empty() {
        return Err(AppError::Document(
            "Cannot assemble a document without tables".into(),
        ));
    }

    let mut builder = DocumentBuilder::new(config);
    for (table, columns) in tables {
        builder.add_table(table, columns)?;
    }
    builder.finish()
}

/// Assembles a self-contained document for a single table.
pub fn assemble_individual(
    table: &str,
    columns: &[ColumnDescriptor],
    config: &GeneratorConfig,
) -> AppResult<Document> {
    let mut builder = DocumentBuilder::new(config);
    builder.add_table(table, columns)?;
    builder.finish()
}

/// Accumulates schemas and paths while tracking name ownership.
struct DocumentBuilder<'a> {
    config: &'a GeneratorConfig,
    doc: Document,
    /// Lowercased schema name -> table that introduced it.
    schema_owners: HashMap<String, String>,
    operation_ids: HashSet<String>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            doc: Document {
                info: config.info.clone(),
                servers: config.servers.clone(),
                schemas: IndexMap::new(),
                paths: IndexMap::new(),
                diagnostics: Vec::new(),
            },
            schema_owners: HashMap::new(),
            operation_ids: HashSet::new(),
        }
    }

    fn add_table(&mut self, table: &str, columns: &[ColumnDescriptor]) -> AppResult<()> {
        let schema = build_schema(table, columns)?;
        let create = create_schema(&schema);
        let paths = build_paths(table, &schema, &self.config.list);

        tracing::debug!(
            table,
            schema = %schema.name,
            operations = paths.items.len(),
            "Built table artifacts"
        );

        self.insert_schema(table, schema)?;
        self.insert_schema(table, create)?;
        for item in paths.items {
            self.insert_path(table, item)?;
        }
        self.doc.diagnostics.extend(paths.diagnostics);
        Ok(())
    }

    fn insert_schema(&mut self, table: &str, schema: SchemaObject) -> AppResult<()> {
        let key = schema.name.to_lowercase();
        if let Some(owner) = self.schema_owners.get(&key) {
            return Err(AppError::Document(format!(
                "Schema name '{}' from table '{}' collides with a schema from table '{}'",
                schema.name, table, owner
            )));
        }
        self.schema_owners.insert(key, table.to_string());
        self.doc.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    fn insert_path(&mut self, table: &str, item: PathItem) -> AppResult<()> {
        if !self.operation_ids.insert(item.operation_id.clone()) {
            return Err(AppError::Document(format!(
                "Operation id '{}' from table '{}' is already in use",
                item.operation_id, table
            )));
        }
        self.doc
            .paths
            .entry(item.path.clone())
            .or_default()
            .push(item);
        Ok(())
    }

    fn finish(mut self) -> AppResult<Document> {
        self.insert_schema("(shared)", error_schema())?;
        validate_document(&self.doc)?;
        Ok(self.doc)
    }
}
