//! # Diesel Schema Parsing
//!
//! Reads the `table!` blocks of a Diesel `schema.rs` into a `StaticProvider`.
//!
//! Supported shape (as emitted by `diesel print-schema`):
//!
//! ```text
//! diesel::table! {
//!     /// The users table.
//!     users (id) {
//!         id -> Int4,
//!         bio -> Nullable<Text>,
//!     }
//! }
//! ```
//!
//! Doc comments become column comments, `#[max_length = N]` becomes the column's
//! maximum length and `Nullable<T>` marks the column nullable. A header without
//! a key list gets Diesel's default primary key, `id`.
//! `joinable!` and `allow_tables_to_appear_in_same_query!` are ignored.

use super::{ColumnDescriptor, StaticProvider};
use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

/// Key Diesel assumes when a `table!` header has no key list.
const DEFAULT_PRIMARY_KEY: &str = "id";

struct PendingTable {
    name: String,
    primary_keys: Vec<String>,
    columns: Vec<ColumnDescriptor>,
}

/// Parses Diesel schema source code.
///
/// Fails with `AppError::Provider` when no table is found or a block is left open.
pub fn parse_diesel_schema(source: &str) -> AppResult<StaticProvider> {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    let header_re = HEADER_RE.get_or_init(|| {
        Regex::new(r"^(?:\w+\.)?(?:r#)?(\w+)\s*(?:\(([^)]*)\))?\s*\{$").expect("Invalid regex")
    });

    static COLUMN_RE: OnceLock<Regex> = OnceLock::new();
    let column_re = COLUMN_RE.get_or_init(|| {
        Regex::new(r"^(?:r#)?(\w+)\s*->\s*(.+?)\s*,?$").expect("Invalid regex")
    });

    static MAX_LENGTH_RE: OnceLock<Regex> = OnceLock::new();
    let max_length_re = MAX_LENGTH_RE.get_or_init(|| {
        Regex::new(r"^#\[max_length\s*=\s*(\d+)\s*\]$").expect("Invalid regex")
    });

    let mut provider = StaticProvider::new();
    let mut found = false;
    let mut current: Option<PendingTable> = None;
    let mut doc_lines: Vec<String> = Vec::new();
    let mut max_length: Option<u32> = None;

    for (line_no, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();

        if let Some(doc) = line.strip_prefix("///") {
            doc_lines.push(doc.trim().to_string());
            continue;
        }
        if let Some(caps) = max_length_re.captures(line) {
            max_length = caps[1].parse().ok();
            continue;
        }
        if line.is_empty() || line.starts_with("//") || line.starts_with("#[") {
            continue;
        }

        if line.starts_with('}') {
            if let Some(done) = current.take() {
                provider = provider.with_table(done.name, done.columns);
                found = true;
            }
            doc_lines.clear();
            max_length = None;
            continue;
        }

        match current.as_mut() {
            None => {
                if let Some(caps) = header_re.captures(line) {
                    let primary_keys = caps
                        .get(2)
                        .map(|m| {
                            m.as_str()
                                .split(',')
                                .map(|k| k.trim().trim_start_matches("r#").to_string())
                                .filter(|k| !k.is_empty())
                                .collect()
                        })
                        .unwrap_or_else(|| vec![DEFAULT_PRIMARY_KEY.to_string()]);
                    current = Some(PendingTable {
                        name: caps[1].to_string(),
                        primary_keys,
                        columns: Vec::new(),
                    });
                }
                doc_lines.clear();
            }
            Some(table) => {
                if let Some(caps) = column_re.captures(line) {
                    let name = caps[1].to_string();
                    let (native_type, nullable) = unwrap_nullable(&caps[2]);
                    let mut column = ColumnDescriptor::new(name, native_type);
                    column.nullable = nullable;
                    column.is_primary_key = table.primary_keys.contains(&column.name);
                    column.max_length = max_length;
                    if !doc_lines.is_empty() {
                        column.comment = Some(doc_lines.join(" "));
                    }
                    table.columns.push(column);
                } else if !line.starts_with("use ") {
                    return Err(AppError::Provider(format!(
                        "Unrecognised line {} in table '{}': {}",
                        line_no + 1,
                        table.name,
                        line
                    )));
                }
                doc_lines.clear();
                max_length = None;
            }
        }
    }

    if let Some(table) = current {
        return Err(AppError::Provider(format!(
            "Table '{}' block is not closed",
            table.name
        )));
    }
    if !found {
        return Err(AppError::Provider(
            "No table! definitions found in Diesel schema".into(),
        ));
    }

    Ok(provider)
}

/// Strips `Nullable<...>` and module paths from a Diesel SQL type.
fn unwrap_nullable(sql_type: &str) -> (String, bool) {
    static PATH_RE: OnceLock<Regex> = OnceLock::new();
    let path_re = PATH_RE.get_or_init(|| Regex::new(r"(?:\w+::)+").expect("Invalid regex"));

    let cleaned = path_re.replace_all(sql_type.trim(), "").replace(' ', "");
    match cleaned
        .strip_prefix("Nullable<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        Some(inner) => (inner.to_string(), true),
        None => (cleaned, false),
    }
}
