//! Input schema: where the chart of accounts and the records live

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::CalcOptions;
use crate::types::*;

/// CSV file names of the chart of accounts, one per section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartFiles {
    #[serde(alias = "Assets")]
    pub assets: String,
    #[serde(alias = "Liabilities")]
    pub liabilities: String,
    #[serde(alias = "Equity")]
    pub equity: String,
    #[serde(alias = "Revenues")]
    pub revenues: String,
    #[serde(alias = "Expenses")]
    pub expenses: String,
}

impl ChartFiles {
    /// File name configured for a section
    pub fn file(&self, section: Section) -> &str {
        match section {
            Section::Assets => &self.assets,
            Section::Liabilities => &self.liabilities,
            Section::Equity => &self.equity,
            Section::Revenues => &self.revenues,
            Section::Expenses => &self.expenses,
        }
    }
}

/// A CSV file of transaction records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFile {
    /// 0 excludes the file from the calculation
    #[serde(alias = "Include", default = "default_include")]
    pub include: u8,
    /// File name, relative to the schema's working directory
    #[serde(alias = "Id", default)]
    pub id: String,
}

fn default_include() -> u8 {
    1
}

impl RecordFile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            include: 1,
            id: id.into(),
        }
    }

    pub fn is_included(&self) -> bool {
        self.include != 0
    }
}

/// Description of one calculation's inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Working directory the CSV file names are relative to
    #[serde(alias = "Path", default)]
    pub path: PathBuf,
    #[serde(alias = "Chart", default)]
    pub chart: ChartFiles,
    #[serde(alias = "Records", default)]
    pub records: Vec<RecordFile>,
    #[serde(alias = "Options", default)]
    pub options: CalcOptions,
}

/// Schema file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Detect the format from a file extension
    pub fn detect(path: &Path) -> LedgerResult<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(SchemaFormat::Json),
            "yaml" | "yml" => Ok(SchemaFormat::Yaml),
            _ => Err(LedgerError::new(
                ErrorKind::WrongResourceType,
                format!(
                    "Schema '{}' must be a .json, .yaml or .yml file",
                    path.display()
                ),
            )
            .with_resource(path.display().to_string())),
        }
    }
}

impl Schema {
    /// Read a schema from a JSON or YAML file
    pub fn from_path(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let resource = path.display().to_string();
        let format = SchemaFormat::detect(path).map_err(|e| e.crumb("read_schema"))?;

        let text = std::fs::read_to_string(path).map_err(|e| {
            let kind = match e.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::ResourceNotFound,
                _ => ErrorKind::Unreadable,
            };
            LedgerError::new(kind, format!("Failed to read schema: {}", resource))
                .with_resource(resource.clone())
                .with_cause(e)
                .crumb("read_schema")
        })?;

        tracing::debug!(schema = %resource, ?format, "schema read");
        Self::parse(&text, format).map_err(|e| e.with_resource(resource).crumb("read_schema"))
    }

    /// Parse schema text in the given format
    pub fn parse(text: &str, format: SchemaFormat) -> LedgerResult<Self> {
        let parsed = match format {
            SchemaFormat::Json => serde_json::from_str(text).map_err(|e| {
                LedgerError::new(ErrorKind::Unreadable, "Schema is not valid JSON").with_cause(e)
            }),
            SchemaFormat::Yaml => serde_yaml::from_str(text).map_err(|e| {
                LedgerError::new(ErrorKind::Unreadable, "Schema is not valid YAML").with_cause(e)
            }),
        };
        parsed.map_err(|e| e.crumb("parse_schema"))
    }
}
