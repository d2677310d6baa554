#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts native database column types (MySQL, PostgreSQL and Diesel SQL type
//! names) into a specification-level type representation.
//!
//! The mapping is total: anything unrecognised falls back to a plain string so a
//! document can always be built.

use crate::provider::ColumnDescriptor;
use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;

/// Represents the simplified OpenAPI data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A string type.
    String,
    /// An integer type.
    Integer,
    /// A floating point number.
    Number,
    /// A boolean type.
    Boolean,
    /// A free-form JSON object.
    Object,
    /// An array of items described by `TypeDescriptor::items`.
    Array,
}

impl TypeKind {
    /// The OpenAPI `type` keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::String => "string",
            TypeKind::Integer => "integer",
            TypeKind::Number => "number",
            TypeKind::Boolean => "boolean",
            TypeKind::Object => "object",
            TypeKind::Array => "array",
        }
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the schema definition for a mapped column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// The primary type.
    pub kind: TypeKind,
    /// Optional format specifier (e.g., "int64", "date-time").
    pub format: Option<String>,
    /// Whether the value can be null.
    pub nullable: bool,
    /// Maximum string length, when the column declares one.
    pub max_length: Option<u32>,
    /// Allowed values for `enum(...)` / `set(...)` columns.
    pub enum_values: Vec<String>,
    /// Element type for arrays.
    pub items: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// A descriptor with no format and no constraints.
    pub fn simple(kind: TypeKind) -> Self {
        Self {
            kind,
            format: None,
            nullable: false,
            max_length: None,
            enum_values: Vec::new(),
            items: None,
        }
    }

    /// A descriptor carrying a format specifier.
    pub fn formatted(kind: TypeKind, format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Self::simple(kind)
        }
    }

    /// Returns a copy with the nullable flag replaced.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// True for strings without a format (free text columns).
    pub fn is_plain_string(&self) -> bool {
        self.kind == TypeKind::String && self.format.is_none() && self.enum_values.is_empty()
    }
}

/// Trait for converting column descriptors to type descriptors.
pub trait TypeMapper {
    /// Maps a column to its specification-level type. Must never fail.
    fn map(&self, column: &ColumnDescriptor) -> TypeDescriptor;
}

/// The standard implementation of `TypeMapper` for SQL native types.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlTypeMapper;

impl TypeMapper for SqlTypeMapper {
    fn map(&self, column: &ColumnDescriptor) -> TypeDescriptor {
        let mut descriptor = map_native(&column.native_type, column.max_length);
        descriptor.nullable = column.nullable;
        descriptor
    }
}

/// Maps a column using the default `SqlTypeMapper`.
pub fn map_type(column: &ColumnDescriptor) -> TypeDescriptor {
    SqlTypeMapper.map(column)
}

/// A native type split into its base name, arguments and modifiers.
#[derive(Debug, PartialEq, Eq)]
struct NativeType {
    base: String,
    args: Vec<String>,
    unsigned: bool,
}

fn map_native(native_type: &str, declared_length: Option<u32>) -> TypeDescriptor {
    let lowered = native_type.trim().to_ascii_lowercase();

    if let Some(inner) = array_element(&lowered) {
        let mut descriptor = TypeDescriptor::simple(TypeKind::Array);
        descriptor.items = Some(Box::new(map_native(inner, None)));
        return descriptor;
    }

    // Diesel MySQL spelling: Unsigned<Integer>
    if let Some(inner) = lowered
        .strip_prefix("unsigned<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return map_native(&format!("{} unsigned", inner), declared_length);
    }

    let native = parse_native(&lowered);
    let mut descriptor = map_base(&native.base, &native)
        .or_else(|| {
            // "timestamp with time zone", "bit varying": retry on the first word
            let first = native.base.split_whitespace().next()?;
            map_base(first, &native)
        })
        .unwrap_or_else(|| TypeDescriptor::simple(TypeKind::String));

    if descriptor.kind == TypeKind::String && descriptor.format.is_none() {
        if is_enumeration(&native.base) {
            descriptor.enum_values = enum_values(&raw_args(native_type));
        } else {
            descriptor.max_length = declared_length.or_else(|| {
                if is_length_bounded(&native.base) {
                    native.args.first().and_then(|n| n.parse().ok())
                } else {
                    None
                }
            });
        }
    }

    descriptor
}

fn map_base(base: &str, native: &NativeType) -> Option<TypeDescriptor> {
    let descriptor = match base {
        "bool" | "boolean" => TypeDescriptor::simple(TypeKind::Boolean),
        "tinyint" | "bit" if native.args.first().map(String::as_str) == Some("1") => {
            TypeDescriptor::simple(TypeKind::Boolean)
        }
        "bigint" | "int8" | "bigserial" | "serial8" => {
            TypeDescriptor::formatted(TypeKind::Integer, "int64")
        }
        // Unsigned 32-bit values overflow int32
        "int" | "integer" | "mediumint" | "int4" if native.unsigned => {
            TypeDescriptor::formatted(TypeKind::Integer, "int64")
        }
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "int2" | "int4" | "serial"
        | "serial4" | "smallserial" | "serial2" | "year" => {
            TypeDescriptor::formatted(TypeKind::Integer, "int32")
        }
        "float" | "real" | "float4" => TypeDescriptor::formatted(TypeKind::Number, "float"),
        "double" | "double precision" | "float8" | "decimal" | "numeric" | "money" => {
            TypeDescriptor::formatted(TypeKind::Number, "double")
        }
        "date" => TypeDescriptor::formatted(TypeKind::String, "date"),
        "datetime" | "timestamp" | "timestamptz" => {
            TypeDescriptor::formatted(TypeKind::String, "date-time")
        }
        "time" | "timetz" => TypeDescriptor::formatted(TypeKind::String, "time"),
        "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" | "bytea" => {
            TypeDescriptor::formatted(TypeKind::String, "byte")
        }
        "json" | "jsonb" => TypeDescriptor::simple(TypeKind::Object),
        "uuid" => TypeDescriptor::formatted(TypeKind::String, "uuid"),
        "varchar" | "char" | "character" | "character varying" | "nchar" | "nvarchar"
        | "bpchar" | "text" | "tinytext" | "mediumtext" | "longtext" | "citext" | "enum"
        | "set" => TypeDescriptor::simple(TypeKind::String),
        _ => return None,
    };
    Some(descriptor)
}

fn is_length_bounded(base: &str) -> bool {
    matches!(
        base,
        "varchar" | "char" | "character" | "character varying" | "nchar" | "nvarchar" | "bpchar"
    )
}

fn is_enumeration(base: &str) -> bool {
    matches!(base, "enum" | "set")
}

/// Returns the element type of `T[]` or `array<T>`.
fn array_element(lowered: &str) -> Option<&str> {
    if let Some(inner) = lowered.strip_suffix("[]") {
        return Some(inner.trim());
    }
    lowered
        .strip_prefix("array<")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(str::trim)
}

fn parse_native(lowered: &str) -> NativeType {
    let (head, args, tail) = match (lowered.find('('), lowered.rfind(')')) {
        (Some(open), Some(close)) if close > open => (
            &lowered[..open],
            lowered[open + 1..close]
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            &lowered[close + 1..],
        ),
        _ => (lowered, Vec::new(), ""),
    };

    let unsigned = head
        .split_whitespace()
        .chain(tail.split_whitespace())
        .any(|w| w == "unsigned");

    // Modifiers after the argument list ("with time zone") are not part of the base
    let words: Vec<&str> = head
        .split_whitespace()
        .filter(|w| !matches!(*w, "unsigned" | "signed" | "zerofill"))
        .collect();

    NativeType {
        base: words.join(" "),
        args,
        unsigned,
    }
}

/// Argument list in its original casing (enum literals are case sensitive).
fn raw_args(native_type: &str) -> String {
    match (native_type.find('('), native_type.rfind(')')) {
        (Some(open), Some(close)) if close > open => native_type[open + 1..close].to_string(),
        _ => String::new(),
    }
}

fn enum_values(args: &str) -> Vec<String> {
    static LITERAL_RE: OnceLock<Regex> = OnceLock::new();
    let literal_re =
        LITERAL_RE.get_or_init(|| Regex::new(r"'((?:[^']|'')*)'").expect("Invalid regex"));

    literal_re
        .captures_iter(args)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace("''", "'"))
        .collect()
}
