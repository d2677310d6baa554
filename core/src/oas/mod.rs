#![deny(missing_docs)]

//! # OpenAPI Generation Module
//!
//! - **models**: Typed document entities.
//! - **naming**: Schema names, operation ids and path templates.
//! - **schemas**: Row, create-payload and error schema builders.
//! - **routes**: CRUD path builder.
//! - **document**: Consolidated and per-table assembly.
//! - **validation**: Document invariant checks.
//! - **render**: Conversion to the OpenAPI 3.0 object model.

pub mod document;
pub mod models;
pub mod naming;
pub mod render;
pub mod routes;
pub mod schemas;
pub mod validation;

pub use document::{assemble, assemble_individual};
pub use models::{
    Diagnostic, DiagnosticLevel, Document, HttpMethod, ParamLocation, ParamSchema, Parameter,
    PathItem, Property, ResponseBody, ResponseDef, SchemaObject, SchemaRef, TablePaths,
};
pub use render::{render_document, OPENAPI_VERSION};
pub use routes::build_paths;
pub use schemas::{build_schema, build_schema_with, create_schema, error_schema};
pub use validation::validate_document;
