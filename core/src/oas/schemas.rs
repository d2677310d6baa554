#![deny(missing_docs)]

//! # Table Schema Builder
//!
//! Turns one table's column descriptors into component schemas:
//!
//! - `{Name}`: the full row shape, primary keys marked read-only.
//! - `New{Name}`: the create payload, without the generated primary key.
//! - `Error`: the shared error envelope used by 4xx responses.

use crate::error::{AppError, AppResult};
use crate::oas::models::{Property, SchemaObject};
use crate::oas::naming::{create_schema_name, resource_label, schema_name, ERROR_SCHEMA_NAME};
use crate::provider::ColumnDescriptor;
use crate::type_mapping::{SqlTypeMapper, TypeDescriptor, TypeKind, TypeMapper};
use indexmap::IndexMap;

/// Builds the row schema of `table` with the default SQL type mapper.
pub fn build_schema(table: &str, columns: &[ColumnDescriptor]) -> AppResult<SchemaObject> {
    build_schema_with(table, columns, &SqlTypeMapper)
}

/// Builds the row schema of `table` using a custom type mapper.
///
/// Fails with `AppError::Schema` when there are no columns or when a column
/// name appears twice.
pub fn build_schema_with(
    table: &str,
    columns: &[ColumnDescriptor],
    mapper: &dyn TypeMapper,
) -> AppResult<SchemaObject> {
    if columns.is_empty() {
        return Err(AppError::Schema(format!(
            "Table '{}' has no columns",
            table
        )));
    }

    let mut properties = IndexMap::with_capacity(columns.len());
    let mut required = Vec::new();
    let mut primary_keys = Vec::new();

    for column in columns {
        if properties.contains_key(&column.name) {
            return Err(AppError::Schema(format!(
                "Table '{}' declares column '{}' more than once",
                table, column.name
            )));
        }

        let property = Property {
            ty: mapper.map(column),
            read_only: column.is_primary_key,
            description: describe_column(column),
        };

        if !column.nullable && column.default.is_none() {
            required.push(column.name.clone());
        }
        if column.is_primary_key {
            primary_keys.push(column.name.clone());
        }
        properties.insert(column.name.clone(), property);
    }

    Ok(SchemaObject {
        name: schema_name(table),
        description: Some(format!("A {} record.", resource_label(table))),
        properties,
        required,
        primary_keys,
    })
}

/// Derives the `New{Name}` create payload from a row schema.
///
/// A single-column primary key is removed since the server assigns it.
/// Composite keys stay, as the client has to supply them.
pub fn create_schema(schema: &SchemaObject) -> SchemaObject {
    let generated = schema.single_primary_key();

    let properties = schema
        .properties
        .iter()
        .filter(|(name, _)| Some(name.as_str()) != generated)
        .map(|(name, prop)| {
            let mut prop = prop.clone();
            prop.read_only = false;
            (name.clone(), prop)
        })
        .collect();

    let required = schema
        .required
        .iter()
        .filter(|name| Some(name.as_str()) != generated)
        .cloned()
        .collect();

    SchemaObject {
        name: create_schema_name(&schema.name),
        description: Some(format!("Payload for creating a {}.", schema.name)),
        properties,
        required,
        primary_keys: Vec::new(),
    }
}

/// The shared `Error` schema.
pub fn error_schema() -> SchemaObject {
    let mut properties = IndexMap::new();
    properties.insert(
        "error".to_string(),
        described(TypeDescriptor::simple(TypeKind::String), "Error message"),
    );
    properties.insert(
        "code".to_string(),
        described(
            TypeDescriptor::formatted(TypeKind::Integer, "int32"),
            "Error code",
        ),
    );
    properties.insert(
        "details".to_string(),
        described(
            TypeDescriptor::simple(TypeKind::Object),
            "Additional error details",
        ),
    );

    SchemaObject {
        name: ERROR_SCHEMA_NAME.to_string(),
        description: Some("Error response.".to_string()),
        properties,
        required: vec!["error".to_string(), "code".to_string()],
        primary_keys: Vec::new(),
    }
}

fn described(ty: TypeDescriptor, description: &str) -> Property {
    Property {
        ty,
        read_only: false,
        description: Some(description.to_string()),
    }
}

/// Picks a property description: the column comment, else a name heuristic.
fn describe_column(column: &ColumnDescriptor) -> Option<String> {
    if let Some(comment) = column.comment.as_deref().map(str::trim) {
        if !comment.is_empty() {
            return Some(comment.to_string());
        }
    }

    let name = column.name.to_lowercase();
    let text = if column.is_primary_key {
        "Unique identifier"
    } else if name.contains("email") {
        "Email address"
    } else if name.contains("phone") {
        "Phone number"
    } else if name == "created_at" {
        "Creation timestamp"
    } else if name == "updated_at" {
        "Last update timestamp"
    } else if name.ends_with("_id") {
        "Foreign key reference"
    } else {
        return None;
    };
    Some(text.to_string())
}
