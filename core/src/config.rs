#![deny(missing_docs)]

//! # Generator Configuration
//!
//! Static document metadata and generation options, passed explicitly into the
//! pipeline. Every field has a default so a partial YAML file is enough.

use crate::error::{AppError, AppResult};
use serde::Deserialize;

/// Document-level `info` metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiInfo {
    /// The title of the API.
    pub title: String,
    /// The version of the API document.
    pub version: String,
    /// Optional description for the API.
    pub description: Option<String>,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Generated API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
        }
    }
}

/// A server entry emitted at the document root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerInfo {
    /// Base URL.
    pub url: String,
    /// Optional human readable description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ServerInfo {
    /// Creates a server without description.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }
}

/// Options for the collection (`GET /{table}`) endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    /// Default value of the `limit` query parameter.
    pub default_limit: u32,
    /// Upper bound of the `limit` query parameter.
    pub max_limit: u32,
    /// Emit `sort_by` / `sort_order` parameters.
    pub sorting: bool,
    /// Number of leading columns offered in `sort_by`.
    pub sortable_columns: usize,
    /// Emit `created_from` / `created_to` when a `created_at` column exists.
    pub date_filters: bool,
    /// Emit `search` when the table has several free text columns.
    pub search: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 1000,
            sorting: true,
            sortable_columns: 10,
            date_filters: true,
            search: true,
        }
    }
}

/// Names used for written documents. The writer decides the extension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Destination of the consolidated document.
    pub consolidated_name: String,
    /// Appended to the table name for per-table documents.
    pub per_table_suffix: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            consolidated_name: "openapi".to_string(),
            per_table_suffix: "_api".to_string(),
        }
    }
}

impl OutputOptions {
    /// Destination of the per-table document for `table`.
    pub fn per_table_destination(&self, table: &str) -> String {
        format!("{}{}", table, self.per_table_suffix)
    }
}

/// Full generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// `info` block.
    pub info: ApiInfo,
    /// Root `servers` list.
    pub servers: Vec<ServerInfo>,
    /// Collection endpoint options.
    pub list: ListOptions,
    /// Output naming.
    pub output: OutputOptions,
}

impl GeneratorConfig {
    /// Parses a configuration from YAML.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| AppError::General(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option consistency.
    pub fn validate(&self) -> AppResult<()> {
        if self.info.title.trim().is_empty() {
            return Err(AppError::General("info.title must not be empty".into()));
        }
        if self.info.version.trim().is_empty() {
            return Err(AppError::General("info.version must not be empty".into()));
        }
        if self.list.default_limit == 0 || self.list.default_limit > self.list.max_limit {
            return Err(AppError::General(format!(
                "list.default_limit must be between 1 and list.max_limit ({})",
                self.list.max_limit
            )));
        }
        if let Some(server) = self.servers.iter().find(|s| s.url.trim().is_empty()) {
            return Err(AppError::General(format!(
                "Server URL must not be empty (description: {:?})",
                server.description
            )));
        }
        Ok(())
    }
}
