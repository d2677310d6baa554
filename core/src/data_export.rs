#![deny(missing_docs)]

//! # Data Export
//!
//! Dumps table contents as column-ordered records and summarises the run in an
//! export metadata document:
//!
//! ```yaml
//! export_info:
//!   database: shop
//!   export_date: 2024-05-01T12:00:00
//!   total_tables: 1
//!   total_records: 2
//!   tables:
//!     - { name: users, file: users.yaml, records: 2 }
//! ```

use crate::error::{AppError, AppResult};
use crate::provider::{is_valid_table_name, ColumnDescriptor, RowProvider, SchemaProvider};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

/// A single exported row, keyed by column name in column order.
pub type Record = IndexMap<String, Value>;

/// Orders each row by `columns`.
///
/// Columns missing from a row become `null`; keys that are not columns are dropped.
pub fn table_records(columns: &[ColumnDescriptor], rows: Vec<Record>) -> Vec<Record> {
    rows.into_iter()
        .map(|mut row| {
            columns
                .iter()
                .map(|col| {
                    let value = row.shift_remove(&col.name).unwrap_or(Value::Null);
                    (col.name.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// One line of the export summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableExportEntry {
    /// Table name.
    pub name: String,
    /// File the records were written to.
    pub file: String,
    /// Number of records.
    pub records: usize,
}

/// Summary of a data export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportMetadata {
    /// Database name, when known.
    pub database: Option<String>,
    /// Export timestamp (ISO 8601).
    pub export_date: String,
    /// Number of exported tables.
    pub total_tables: usize,
    /// Number of exported records across tables.
    pub total_records: usize,
    /// Per-table entries in export order.
    pub tables: Vec<TableExportEntry>,
}

impl ExportMetadata {
    /// Starts an empty summary.
    pub fn new(database: Option<String>, export_date: impl Into<String>) -> Self {
        Self {
            database,
            export_date: export_date.into(),
            total_tables: 0,
            total_records: 0,
            tables: Vec::new(),
        }
    }

    /// Records one exported table and updates the totals.
    pub fn record_table(
        &mut self,
        name: impl Into<String>,
        file: impl Into<String>,
        records: usize,
    ) {
        self.total_tables += 1;
        self.total_records += records;
        self.tables.push(TableExportEntry {
            name: name.into(),
            file: file.into(),
            records,
        });
    }

    /// The document written to the metadata file, wrapped in `export_info`.
    pub fn to_value(&self) -> AppResult<Value> {
        let info = serde_json::to_value(self)
            .map_err(|e| AppError::General(format!("Failed to serialize export metadata: {}", e)))?;
        Ok(json!({ "export_info": info }))
    }
}

/// Persists exported records and the final summary.
pub trait RecordWriter {
    /// Writes the records of `table` and returns the file name used.
    fn write_records(&mut self, table: &str, records: &[Record]) -> AppResult<String>;

    /// Writes the export summary.
    fn write_metadata(&mut self, metadata: &ExportMetadata) -> AppResult<()>;
}

/// Outcome of `export_data`.
#[derive(Debug)]
pub struct ExportReport {
    /// Summary of the tables that were written.
    pub metadata: ExportMetadata,
    /// Tables that failed, with their errors.
    pub failed: Vec<(String, AppError)>,
    /// Tables skipped for having unsafe names.
    pub skipped: Vec<String>,
}

/// Exports every table of `provider` through `writer`.
///
/// Per-table failures are logged and collected without stopping the run. The
/// metadata file is written last. Listing the tables or writing the metadata
/// are the only fatal errors.
pub fn export_data<P, W>(
    provider: &P,
    writer: &mut W,
    database: Option<String>,
    export_date: &str,
) -> AppResult<ExportReport>
where
    P: SchemaProvider + RowProvider + ?Sized,
    W: RecordWriter + ?Sized,
{
    let mut metadata = ExportMetadata::new(database, export_date);
    let mut failed = Vec::new();
    let mut skipped = Vec::new();

    for table in provider.list_tables()? {
        if !is_valid_table_name(&table) {
            tracing::warn!(table = %table, "Skipping invalid table name");
            skipped.push(table);
            continue;
        }

        let result = export_table(provider, &table)
            .and_then(|records| Ok((writer.write_records(&table, &records)?, records.len())));

        match result {
            Ok((file, count)) => {
                tracing::info!(table = %table, records = count, file = %file, "Exported table");
                metadata.record_table(table, file, count);
            }
            Err(error) => {
                tracing::error!(table = %table, %error, "Table export failed");
                failed.push((table, error));
            }
        }
    }

    writer.write_metadata(&metadata)?;
    Ok(ExportReport {
        metadata,
        failed,
        skipped,
    })
}

fn export_table<P>(provider: &P, table: &str) -> AppResult<Vec<Record>>
where
    P: SchemaProvider + RowProvider + ?Sized,
{
    let rows = provider.fetch_rows(table)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let columns = provider.get_columns(table)?;
    Ok(table_records(&columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticProvider;

    fn row(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_records_follow_column_order() {
        let columns = vec![
            ColumnDescriptor::new("id", "int"),
            ColumnDescriptor::new("name", "text"),
            ColumnDescriptor::new("bio", "text"),
        ];
        let rows = vec![row(&[
            ("name", json!("Ada")),
            ("extra", json!(true)),
            ("id", json!(1)),
        ])];

        let records = table_records(&columns, rows);
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["id", "name", "bio"]
        );
        assert_eq!(records[0]["bio"], Value::Null);
        assert!(!records[0].contains_key("extra"));
    }

    #[test]
    fn test_metadata_totals() {
        let mut metadata = ExportMetadata::new(Some("shop".into()), "2024-05-01T12:00:00");
        metadata.record_table("users", "users.yaml", 2);
        metadata.record_table("tags", "tags.yaml", 0);

        let value = metadata.to_value().unwrap();
        assert_eq!(value["export_info"]["database"], "shop");
        assert_eq!(value["export_info"]["total_tables"], 2);
        assert_eq!(value["export_info"]["total_records"], 2);
        assert_eq!(value["export_info"]["tables"][1]["file"], "tags.yaml");
    }

    #[derive(Default)]
    struct Collecting {
        files: IndexMap<String, Vec<Record>>,
        metadata: Option<ExportMetadata>,
    }

    impl RecordWriter for Collecting {
        fn write_records(&mut self, table: &str, records: &[Record]) -> AppResult<String> {
            if table == "locked" {
                return Err(AppError::General("locked".into()));
            }
            let file = format!("{}.yaml", table);
            self.files.insert(file.clone(), records.to_vec());
            Ok(file)
        }

        fn write_metadata(&mut self, metadata: &ExportMetadata) -> AppResult<()> {
            self.metadata = Some(metadata.clone());
            Ok(())
        }
    }

    #[test]
    fn test_export_data() {
        let provider = StaticProvider::new()
            .with_database("shop")
            .with_table(
                "users",
                vec![ColumnDescriptor::new("id", "int"), ColumnDescriptor::new("name", "text")],
            )
            .with_rows(
                "users",
                vec![row(&[("id", json!(1))]), row(&[("id", json!(2)), ("name", json!("Bo"))])],
            )
            .with_table("empty", vec![ColumnDescriptor::new("id", "int")])
            .with_table("locked", vec![ColumnDescriptor::new("id", "int")])
            .with_table("bad-name", vec![ColumnDescriptor::new("id", "int")]);

        let mut writer = Collecting::default();
        let report = export_data(
            &provider,
            &mut writer,
            provider.database().map(String::from),
            "2024-05-01T12:00:00",
        )
        .unwrap();

        assert_eq!(
            writer.files.keys().collect::<Vec<_>>(),
            vec!["users.yaml", "empty.yaml"]
        );
        assert!(writer.files["empty.yaml"].is_empty());
        assert_eq!(writer.files["users.yaml"][0]["name"], Value::Null);

        assert_eq!(report.metadata.total_tables, 2);
        assert_eq!(report.metadata.total_records, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "locked");
        assert_eq!(report.skipped, vec!["bad-name"]);
        assert_eq!(writer.metadata, Some(report.metadata));
    }
}
