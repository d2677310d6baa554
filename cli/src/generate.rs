#![deny(missing_docs)]

//! # Generate Command
//!
//! Implements the pipeline: Schema source -> Document Assembler -> OpenAPI files.
//!
//! 1. **Configuration**: YAML config file, then CLI flags / environment on top.
//! 2. **Provider**: Diesel schema or schema manifest (see `source`).
//! 3. **Generation**: consolidated document, or one document per table plus an
//!    `api_index` file.

use crate::source::load_provider;
use crate::writer::{api_index, FileWriter, OutputFormat};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tablespec_core::{run, AppError, AppResult, GeneratorConfig, OutputMode, ServerInfo};

/// File name (without extension) of the per-table index.
pub const API_INDEX_NAME: &str = "api_index";

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Schema source: a manifest (.yaml/.yml/.json) or a Diesel schema (.rs).
    #[clap(long, env = "TABLESPEC_SCHEMA")]
    pub schema: PathBuf,

    /// Output directory for generated documents.
    #[clap(long, default_value = "exports/openapi", env = "TABLESPEC_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Output file format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Write one self-contained document per table instead of a single one.
    #[clap(long)]
    pub per_table: bool,

    /// Generator configuration file (YAML).
    #[clap(long, env = "TABLESPEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides `info.title`.
    #[clap(long, env = "TABLESPEC_API_TITLE")]
    pub title: Option<String>,

    /// Overrides `info.version`.
    #[clap(long, env = "TABLESPEC_API_VERSION")]
    pub api_version: Option<String>,

    /// Overrides `info.description`.
    #[clap(long)]
    pub description: Option<String>,

    /// Replaces the configured servers. Repeatable.
    #[clap(long = "server")]
    pub servers: Vec<String>,
}

impl GenerateArgs {
    fn mode(&self) -> OutputMode {
        if self.per_table {
            OutputMode::PerTable
        } else {
            OutputMode::Consolidated
        }
    }
}

/// Loads the config file (if any) and applies the flag overrides.
pub fn resolve_config(args: &GenerateArgs) -> AppResult<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(title) = &args.title {
        config.info.title = title.clone();
    }
    if let Some(version) = &args.api_version {
        config.info.version = version.clone();
    }
    if let Some(description) = &args.description {
        config.info.description = Some(description.clone());
    }
    if !args.servers.is_empty() {
        config.servers = args.servers.iter().map(ServerInfo::new).collect();
    }

    config.validate()?;
    Ok(config)
}

fn load_config(path: &Path) -> AppResult<GeneratorConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::General(format!("Cannot read config {:?}: {}", path, e)))?;
    GeneratorConfig::from_yaml_str(&content)
}

/// Executes the generate command.
///
/// Returns an error when any table failed, after everything else was written.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let config = resolve_config(args)?;
    let provider = load_provider(&args.schema)?;
    let mut writer = FileWriter::new(&args.output_dir, args.format);
    let mode = args.mode();

    println!(
        "Generating OpenAPI from {:?} into {:?}...",
        args.schema, args.output_dir
    );
    let report = run(&provider, &mut writer, &config, mode)?;

    if mode == OutputMode::PerTable {
        let apis: IndexMap<String, String> = report
            .written
            .iter()
            .filter_map(|w| {
                w.table
                    .as_ref()
                    .map(|t| (t.clone(), writer.file_name(&w.destination)))
            })
            .collect();
        let failed: Vec<String> = report.failed.iter().map(|f| f.table.clone()).collect();
        let generated_at = chrono::Local::now().to_rfc3339();
        let index = api_index(
            &config.info.title,
            &config.info.version,
            &generated_at,
            &apis,
            &failed,
        );
        writer.write_value(API_INDEX_NAME, &index)?;
    }

    for path in writer.written() {
        println!("  - {}", path.display());
    }
    for diagnostic in &report.diagnostics {
        println!("  ! {}", diagnostic);
    }
    for failure in &report.failed {
        eprintln!("  x {}: {}", failure.table, failure.error);
    }

    if report.is_success() {
        println!(
            "Generated {} document(s) in {:?}.",
            report.written.len(),
            writer.dir()
        );
        Ok(())
    } else {
        Err(AppError::General(format!(
            "{} table(s) failed to generate",
            report.failed.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"
database: shop
tables:
  - name: users
    columns:
      - { name: id, type: int, primary_key: true }
      - { name: name, type: "varchar(100)" }
  - name: ghosts
    columns: []
"#;

    fn args(schema: PathBuf, output_dir: PathBuf) -> GenerateArgs {
        GenerateArgs {
            schema,
            output_dir,
            format: OutputFormat::Yaml,
            per_table: false,
            config: None,
            title: None,
            api_version: None,
            description: None,
            servers: vec![],
        }
    }

    #[test]
    fn test_resolve_config_overrides() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("tablespec.yaml");
        fs::write(
            &config_path,
            concat!(
                "info:\n  title: From File\n  version: 2.0.0\n",
                "servers:\n  - url: https://api.example.com\n"
            ),
        )
        .unwrap();

        let mut a = args(PathBuf::from("unused.yaml"), dir.path().to_path_buf());
        a.config = Some(config_path);
        let config = resolve_config(&a).unwrap();
        assert_eq!(config.info.title, "From File");
        assert_eq!(config.servers[0].url, "https://api.example.com");

        a.title = Some("From Flag".into());
        a.servers = vec!["http://localhost:3000".into()];
        let config = resolve_config(&a).unwrap();
        assert_eq!(config.info.title, "From Flag");
        assert_eq!(config.info.version, "2.0.0");
        assert_eq!(config.servers, vec![ServerInfo::new("http://localhost:3000")]);
    }

    #[test]
    fn test_per_table_writes_index_and_reports_failure() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("schema.yaml");
        fs::write(&schema, MANIFEST).unwrap();
        let out = dir.path().join("out");

        let mut a = args(schema, out.clone());
        a.per_table = true;
        let err = execute(&a).unwrap_err();
        assert!(matches!(err, AppError::General(msg) if msg.contains("1 table")));

        assert!(out.join("users_api.yaml").exists());
        assert!(!out.join("ghosts_api.yaml").exists());

        let index: Value =
            serde_yaml::from_str(&fs::read_to_string(out.join("api_index.yaml")).unwrap()).unwrap();
        assert_eq!(index["api_index"]["apis"]["users"], "users_api.yaml");
        assert_eq!(index["api_index"]["failed"][0], "ghosts");
    }

    #[test]
    fn test_consolidated_json() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("schema.rs");
        fs::write(
            &schema,
            concat!(
                "diesel::table! {\n",
                "    users (id) {\n",
                "        id -> Int4,\n",
                "        bio -> Nullable<Text>,\n",
                "    }\n",
                "}\n"
            ),
        )
        .unwrap();
        let out = dir.path().join("out");

        let mut a = args(schema, out.clone());
        a.format = OutputFormat::Json;
        execute(&a).unwrap();

        let doc: Value =
            serde_json::from_str(&fs::read_to_string(out.join("openapi.json")).unwrap()).unwrap();
        assert_eq!(
            doc["components"]["schemas"]["User"]["properties"]["bio"]["nullable"],
            true
        );
        assert!(!out.join("api_index.json").exists());
    }
}
