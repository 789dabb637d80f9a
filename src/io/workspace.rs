//! Schema-driven CSV workspace feeding the engine

use std::path::Path;

use crate::io::csv_files::{read_chart_file, read_records_file, ReadOptions};
use crate::io::files::{resolve_csv_name, slot_path};
use crate::io::schema::Schema;
use crate::traits::*;
use crate::types::*;

/// CSV files described by a [`Schema`]
#[derive(Debug, Clone)]
pub struct CsvWorkspace {
    schema: Schema,
}

impl CsvWorkspace {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Read the schema file and open the workspace it describes
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        Ok(Self::new(Schema::from_path(path)?))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn read_options(&self) -> ReadOptions {
        ReadOptions {
            headers: self.schema.options.headers,
            strict_numbers: self.schema.options.strict_numbers,
        }
    }
}

impl ChartSource for CsvWorkspace {
    /// Read every section's chart file, then sort by category id keeping the
    /// declaration order of equal ids
    fn categories(&self) -> LedgerResult<Loaded<Vec<Category>>> {
        let mut loaded = Loaded::<Vec<Category>>::default();

        for section in Section::ALL {
            let slot = slot_path(&self.schema.path, self.schema.chart.file(section));
            let file = match resolve_csv_name(&slot) {
                Ok(file) => file,
                Err(e) if e.kind == ErrorKind::UnnamedResource => {
                    tracing::debug!(%section, "unnamed chart file, section skipped");
                    continue;
                }
                Err(e) => return Err(e.crumb("gather_categories")),
            };

            let chart = read_chart_file(&file, section, self.read_options())
                .map_err(|e| e.crumb("gather_categories"))?;
            tracing::debug!(%section, categories = chart.value.len(), "chart file loaded");

            loaded.value.extend(chart.value);
            loaded.warnings.extend(chart.warnings);
        }

        loaded.value.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(loaded)
    }
}

impl RecordSource for CsvWorkspace {
    /// Read every included record file, in schema order
    fn transactions(&self) -> LedgerResult<Loaded<Vec<Transaction>>> {
        let mut loaded = Loaded::<Vec<Transaction>>::default();

        for record in self.schema.records.iter().filter(|r| r.is_included()) {
            let slot = slot_path(&self.schema.path, &record.id);
            let file = match resolve_csv_name(&slot) {
                Ok(file) => file,
                Err(e) if e.kind == ErrorKind::UnnamedResource => {
                    tracing::debug!("unnamed records file, skipped");
                    continue;
                }
                Err(e) => return Err(e.crumb("gather_transactions")),
            };

            let records = read_records_file(&file, self.read_options())
                .map_err(|e| e.crumb("gather_transactions"))?;
            tracing::debug!(file = %file.display(), transactions = records.value.len(), "records file loaded");

            loaded.value.extend(records.value);
            loaded.warnings.extend(records.warnings);
        }

        Ok(loaded)
    }
}
