#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Typed entities produced by the builders and consumed by the renderer.
//!
//! Everything here is built once per run and never mutated after assembly.

use crate::config::{ApiInfo, ServerInfo};
use crate::type_mapping::TypeDescriptor;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A column property inside a schema object.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The mapped type.
    pub ty: TypeDescriptor,
    /// Server-assigned value (primary keys).
    pub read_only: bool,
    /// Human readable description.
    pub description: Option<String>,
}

impl Property {
    /// Creates a writable property without description.
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            read_only: false,
            description: None,
        }
    }
}

/// A named, reusable type definition describing one table's row shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaObject {
    /// Component name, e.g. `User`.
    pub name: String,
    /// Description of the object.
    pub description: Option<String>,
    /// Properties keyed by column name, in column order.
    pub properties: IndexMap<String, Property>,
    /// Names of properties that must be present.
    pub required: Vec<String>,
    /// Primary key column names, in key order.
    pub primary_keys: Vec<String>,
}

impl SchemaObject {
    /// The primary key column when the key is a single column.
    pub fn single_primary_key(&self) -> Option<&str> {
        match self.primary_keys.as_slice() {
            [pk] => Some(pk.as_str()),
            _ => None,
        }
    }
}

/// A reference to a schema object by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaRef(String);

impl SchemaRef {
    /// Creates a reference to the schema called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The referenced schema name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The JSON pointer form, `#/components/schemas/{name}`.
    pub fn pointer(&self) -> String {
        format!("#/components/schemas/{}", self.0)
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pointer())
    }
}

/// HTTP methods emitted by the path builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Lowercase key used in a path item object.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Templated path segment.
    Path,
    /// Query string.
    Query,
}

impl ParamLocation {
    /// The OpenAPI `in` keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
        }
    }
}

/// Schema of a parameter: a type plus validation keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSchema {
    /// The parameter type.
    pub ty: TypeDescriptor,
    /// Default value.
    pub default: Option<Value>,
    /// Inclusive lower bound.
    pub minimum: Option<i64>,
    /// Inclusive upper bound.
    pub maximum: Option<i64>,
    /// Minimum string length.
    pub min_length: Option<u32>,
}

impl ParamSchema {
    /// Wraps a type without constraints.
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            default: None,
            minimum: None,
            maximum: None,
            min_length: None,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the inclusive range. Either bound may be absent.
    pub fn with_range(mut self, minimum: Option<i64>, maximum: Option<i64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Sets the minimum string length.
    pub fn with_min_length(mut self, min_length: u32) -> Self {
        self.min_length = Some(min_length);
        self
    }
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Whether the parameter is mandatory. Always true for path parameters.
    pub required: bool,
    /// Value schema.
    pub schema: ParamSchema,
    /// Description.
    pub description: Option<String>,
}

/// Body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// A single object.
    Schema(SchemaRef),
    /// A JSON array of objects.
    ArrayOf(SchemaRef),
}

impl ResponseBody {
    /// The schema referenced by the body.
    pub fn schema_ref(&self) -> &SchemaRef {
        match self {
            ResponseBody::Schema(r) | ResponseBody::ArrayOf(r) => r,
        }
    }
}

/// A response for one status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDef {
    /// Description.
    pub description: String,
    /// Optional JSON body.
    pub body: Option<ResponseBody>,
}

impl ResponseDef {
    /// A response without body.
    pub fn empty(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            body: None,
        }
    }

    /// A response with a body.
    pub fn with_body(description: impl Into<String>, body: ResponseBody) -> Self {
        Self {
            description: description.into(),
            body: Some(body),
        }
    }
}

/// One HTTP operation on a route.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    /// Path template, e.g. `/users/{id}`.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Document-unique operation identifier.
    pub operation_id: String,
    /// Short summary.
    pub summary: String,
    /// Longer description.
    pub description: Option<String>,
    /// Grouping tag.
    pub tag: String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Required JSON request body.
    pub request_body: Option<SchemaRef>,
    /// Responses keyed by status code.
    pub responses: BTreeMap<u16, ResponseDef>,
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Something was omitted or skipped.
    Warning,
    /// Informational note.
    Info,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Info => write!(f, "info"),
        }
    }
}

/// A non-fatal observation collected during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub level: DiagnosticLevel,
    /// Table concerned, if any.
    pub table: Option<String>,
    /// Message.
    pub message: String,
}

impl Diagnostic {
    /// A warning about `table`.
    pub fn warning(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            table: Some(table.into()),
            message: message.into(),
        }
    }

    /// An informational note about `table`.
    pub fn info(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            table: Some(table.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{} [{}]: {}", self.level, table, self.message),
            None => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Output of the path builder for one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TablePaths {
    /// Operations in emission order.
    pub items: Vec<PathItem>,
    /// Notes about omitted operations.
    pub diagnostics: Vec<Diagnostic>,
}

/// A complete API document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// `info` block.
    pub info: ApiInfo,
    /// Root servers.
    pub servers: Vec<ServerInfo>,
    /// Component schemas by name.
    pub schemas: IndexMap<String, SchemaObject>,
    /// Operations grouped by path template.
    pub paths: IndexMap<String, Vec<PathItem>>,
    /// Non-fatal notes.
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Iterates over every operation in path order.
    pub fn operations(&self) -> impl Iterator<Item = &PathItem> {
        self.paths.values().flatten()
    }

    /// Finds an operation by id.
    pub fn operation(&self, operation_id: &str) -> Option<&PathItem> {
        self.operations().find(|op| op.operation_id == operation_id)
    }
}
