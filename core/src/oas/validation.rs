#![deny(missing_docs)]

//! # Document Validation
//!
//! Structural checks run by both assembly paths before a document is returned:
//!
//! - Every `required` name is a property of its schema.
//! - Schema names are unique, ignoring case.
//! - Every schema reference resolves in `components.schemas`.
//! - Operation ids are pairwise unique.
//! - Path parameters appear in their path template.

use crate::error::{AppError, AppResult};
use crate::oas::models::{Document, ParamLocation, PathItem, SchemaRef};
use std::collections::{HashMap, HashSet};

/// Validates the invariants of an assembled document.
pub fn validate_document(doc: &Document) -> AppResult<()> {
    validate_schemas(doc)?;

    let mut operation_ids = HashSet::new();
    for (template, items) in &doc.paths {
        for item in items {
            if &item.path != template {
                return Err(AppError::Document(format!(
                    "Operation '{}' is filed under '{}' but declares path '{}'",
                    item.operation_id, template, item.path
                )));
            }
            if !operation_ids.insert(item.operation_id.as_str()) {
                return Err(AppError::Document(format!(
                    "Duplicate operationId '{}'",
                    item.operation_id
                )));
            }
            validate_references(doc, item)?;
            validate_path_parameters(item)?;
        }
    }

    Ok(())
}

fn validate_schemas(doc: &Document) -> AppResult<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (key, schema) in &doc.schemas {
        if key != &schema.name {
            return Err(AppError::Document(format!(
                "Schema '{}' is registered under key '{}'",
                schema.name, key
            )));
        }
        if let Some(previous) = seen.insert(key.to_lowercase(), key.as_str()) {
            return Err(AppError::Document(format!(
                "Schema names '{}' and '{}' collide",
                previous, key
            )));
        }
        if let Some(missing) = schema
            .required
            .iter()
            .find(|name| !schema.properties.contains_key(*name))
        {
            return Err(AppError::Document(format!(
                "Schema '{}' requires unknown property '{}'",
                schema.name, missing
            )));
        }
    }
    Ok(())
}

fn validate_references(doc: &Document, item: &PathItem) -> AppResult<()> {
    let body_refs = item.request_body.iter();
    let response_refs = item
        .responses
        .values()
        .filter_map(|r| r.body.as_ref())
        .map(|b| b.schema_ref());

    for schema_ref in body_refs.chain(response_refs) {
        ensure_resolves(doc, schema_ref, &item.operation_id)?;
    }
    Ok(())
}

fn ensure_resolves(doc: &Document, schema_ref: &SchemaRef, operation_id: &str) -> AppResult<()> {
    if doc.schemas.contains_key(schema_ref.name()) {
        Ok(())
    } else {
        Err(AppError::Document(format!(
            "Operation '{}' references missing schema '{}'",
            operation_id,
            schema_ref.pointer()
        )))
    }
}

fn validate_path_parameters(item: &PathItem) -> AppResult<()> {
    for param in &item.parameters {
        if param.location != ParamLocation::Path {
            continue;
        }
        if !param.required {
            return Err(AppError::Document(format!(
                "Path parameter '{}' of '{}' must be required",
                param.name, item.operation_id
            )));
        }
        if !item.path.contains(&format!("{{{}}}", param.name)) {
            return Err(AppError::Document(format!(
                "Path parameter '{}' of '{}' is not part of '{}'",
                param.name, item.operation_id, item.path
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiInfo, ListOptions};
    use crate::oas::models::{ResponseBody, ResponseDef};
    use crate::oas::routes::build_paths;
    use crate::oas::schemas::{build_schema, create_schema, error_schema};
    use crate::provider::ColumnDescriptor;
    use indexmap::IndexMap;

    fn valid_document() -> Document {
        let schema = build_schema(
            "users",
            &[
                ColumnDescriptor::new("id", "int").primary_key(),
                ColumnDescriptor::new("name", "varchar(100)"),
            ],
        )
        .unwrap();
        let paths = build_paths("users", &schema, &ListOptions::default());

        let mut doc = Document {
            info: ApiInfo::default(),
            servers: vec![],
            schemas: IndexMap::new(),
            paths: IndexMap::new(),
            diagnostics: vec![],
        };
        let new = create_schema(&schema);
        let error = error_schema();
        doc.schemas.insert(schema.name.clone(), schema);
        doc.schemas.insert(new.name.clone(), new);
        doc.schemas.insert(error.name.clone(), error);
        for item in paths.items {
            doc.paths.entry(item.path.clone()).or_default().push(item);
        }
        doc
    }

    #[test]
    fn test_valid_document() {
        assert!(validate_document(&valid_document()).is_ok());
    }

    #[test]
    fn test_dangling_reference() {
        let mut doc = valid_document();
        doc.schemas.shift_remove("NewUser");
        let err = validate_document(&doc).unwrap_err();
        assert!(matches!(err, AppError::Document(msg) if msg.contains("NewUser")));
    }

    #[test]
    fn test_dangling_response_reference() {
        let mut doc = valid_document();
        let op = &mut doc.paths["/users"][0];
        op.responses.insert(
            500,
            ResponseDef::with_body("boom", ResponseBody::Schema(SchemaRef::new("Fault"))),
        );
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn test_duplicate_operation_id() {
        let mut doc = valid_document();
        let dup = doc.paths["/users"][0].clone();
        doc.paths["/users"].push(dup);
        let err = validate_document(&doc).unwrap_err();
        assert!(matches!(err, AppError::Document(msg) if msg.contains("list_users")));
    }

    #[test]
    fn test_required_must_exist() {
        let mut doc = valid_document();
        doc.schemas["User"].required.push("ghost".into());
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn test_case_insensitive_schema_collision() {
        let mut doc = valid_document();
        let mut twin = doc.schemas["User"].clone();
        twin.name = "USER".into();
        doc.schemas.insert("USER".into(), twin);
        let err = validate_document(&doc).unwrap_err();
        assert!(matches!(err, AppError::Document(msg) if msg.contains("collide")));
    }

    #[test]
    fn test_path_parameter_outside_template() {
        let mut doc = valid_document();
        let mut moved = doc.paths["/users/{id}"][0].clone();
        moved.path = "/users".into();
        moved.operation_id = "get_users_moved".into();
        doc.paths["/users"].push(moved);
        let err = validate_document(&doc).unwrap_err();
        assert!(matches!(err, AppError::Document(msg) if msg.contains("not part of")));
    }
}
