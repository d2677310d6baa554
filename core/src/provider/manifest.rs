//! # Schema Manifests
//!
//! A schema manifest is an offline snapshot of a database layout (and,
//! optionally, its contents) in YAML or JSON:
//!
//! ```yaml
//! database: shop
//! tables:
//!   - name: users
//!     columns:
//!       - { name: id, type: "int(11)", primary_key: true }
//!       - { name: bio, type: text, nullable: true }
//!     rows:
//!       - { id: 1, bio: null }
//! ```

use super::{ColumnDescriptor, StaticProvider};
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Root of a schema manifest file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaManifest {
    /// Database name, used in export metadata.
    #[serde(default)]
    pub database: Option<String>,
    /// Tables in output order.
    pub tables: Vec<TableManifest>,
}

/// One table of a schema manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableManifest {
    /// Table name.
    pub name: String,
    /// Columns in physical order.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    /// Optional table contents.
    #[serde(default)]
    pub rows: Vec<IndexMap<String, Value>>,
}

impl SchemaManifest {
    /// Parses a manifest from YAML (JSON is accepted too, being a YAML subset).
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Provider(format!("Failed to parse schema manifest: {}", e)))
    }

    /// Parses a manifest from JSON.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Provider(format!("Failed to parse schema manifest: {}", e)))
    }

    /// Converts the manifest into a provider, rejecting duplicate table names.
    pub fn into_provider(self) -> AppResult<StaticProvider> {
        let mut seen = HashSet::new();
        let mut provider = StaticProvider::new();
        if let Some(database) = self.database {
            provider = provider.with_database(database);
        }

        for table in self.tables {
            if !seen.insert(table.name.clone()) {
                return Err(AppError::Provider(format!(
                    "Table '{}' is declared more than once in the manifest",
                    table.name
                )));
            }
            provider = provider
                .with_table(table.name.clone(), table.columns)
                .with_rows(table.name, table.rows);
        }

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RowProvider, SchemaProvider};
    use serde_json::json;

    const MANIFEST: &str = r#"
database: shop
tables:
  - name: users
    columns:
      - { name: id, type: "int(11)", primary_key: true }
      - { name: name, type: "varchar(100)" }
      - { name: bio, type: text, nullable: true }
      - { name: active, type: "tinyint(1)", default: 1 }
    rows:
      - { id: 1, name: Ada, bio: null, active: 1 }
  - name: tags
    columns:
      - name: label
        native_type: varchar(32)
        is_primary_key: true
        comment: Tag text
"#;

    #[test]
    fn test_parse_yaml_manifest() {
        let provider = SchemaManifest::from_yaml_str(MANIFEST)
            .unwrap()
            .into_provider()
            .unwrap();

        assert_eq!(provider.database(), Some("shop"));
        assert_eq!(provider.list_tables().unwrap(), vec!["users", "tags"]);

        let users = provider.get_columns("users").unwrap();
        assert_eq!(users.len(), 4);
        assert!(users[0].is_primary_key);
        assert_eq!(users[1].native_type, "varchar(100)");
        assert!(!users[1].nullable);
        assert!(users[2].nullable);
        assert_eq!(users[3].default, Some(json!(1)));

        let tags = provider.get_columns("tags").unwrap();
        assert!(tags[0].is_primary_key);
        assert_eq!(tags[0].comment.as_deref(), Some("Tag text"));

        let rows = provider.fetch_rows("users").unwrap();
        assert_eq!(rows[0]["name"], json!("Ada"));
        assert!(provider.fetch_rows("tags").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_manifest() {
        let json = r#"{"tables":[{"name":"items","columns":[{"name":"id","type":"bigint"}]}]}"#;
        let manifest = SchemaManifest::from_json_str(json).unwrap();
        assert_eq!(manifest.database, None);
        assert_eq!(manifest.tables[0].columns[0].native_type, "bigint");
    }

    #[test]
    fn test_duplicate_tables_rejected() {
        let yaml = r#"
tables:
  - name: users
  - name: users
"#;
        let err = SchemaManifest::from_yaml_str(yaml)
            .unwrap()
            .into_provider()
            .unwrap_err();
        assert!(matches!(err, AppError::Provider(msg) if msg.contains("more than once")));
    }

    #[test]
    fn test_malformed_manifest() {
        let err = SchemaManifest::from_yaml_str("tables: 12").unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }
}
