use crate::config::ImporterConfig;
use crate::constants;
use crate::error::Result;
use crate::reshape;
use crate::resolve::{self, Resolver};
use crate::table::Table;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a complete import run.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub rows_read: usize,
    pub rows_written: usize,
    pub resolved_entities: usize,
    pub pre_resolved_entities: usize,
    pub unresolved_entities: usize,
    pub observations_file: String,
    pub debug_resolve_file: String,
}

/// One-shot importer for statistical observation CSVs.
///
/// Runs the pipeline end to end: read, drop ignored columns, rename the
/// positional entity/date columns, resolve entity references to dcids,
/// optionally unpivot to long format, and write the observations plus the
/// resolution debug trace. Nothing is written until every transform has
/// succeeded.
pub struct StatsImporter<'a> {
    input_path: PathBuf,
    output_dir: PathBuf,
    entity_type: String,
    ignore_columns: Vec<String>,
    config: ImporterConfig,
    resolver: &'a dyn Resolver,
}

impl<'a> StatsImporter<'a> {
    pub fn new(
        input_path: &Path,
        output_dir: &Path,
        entity_type: &str,
        ignore_columns: Vec<String>,
        config: ImporterConfig,
        resolver: &'a dyn Resolver,
    ) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            entity_type: entity_type.to_string(),
            ignore_columns,
            config,
            resolver,
        }
    }

    pub fn run(&self) -> Result<ImportReport> {
        // Idempotent; re-running over an existing output directory is fine.
        fs::create_dir_all(&self.output_dir)?;

        let table = Table::load(&self.input_path)?;
        let rows_read = table.rows.len();

        let table = if self.ignore_columns.is_empty() {
            table
        } else {
            table.drop_columns(&self.ignore_columns)?
        };
        let table = self.rename_columns(table)?;

        let outcome =
            resolve::resolve_entities(&table, &self.entity_type, &self.config, self.resolver)?;

        let table = if self.config.unpivot_variables {
            let long = reshape::unpivot_variables(&outcome.table, &self.config)?;
            reshape::reorder_columns(&long, &self.config)?
        } else {
            outcome.table
        };

        let observations_file = self.output_dir.join(constants::OBSERVATIONS_FILE_NAME);
        let debug_resolve_file = self.output_dir.join(constants::DEBUG_RESOLVE_FILE_NAME);

        info!(
            "Writing {} observations to: {}",
            table.rows.len(),
            observations_file.display()
        );
        table.write_csv(&observations_file)?;
        info!(
            "Writing resolutions (for debugging) to: {}",
            debug_resolve_file.display()
        );
        outcome.debug_trace.write_csv(&debug_resolve_file)?;

        Ok(ImportReport {
            rows_read,
            rows_written: table.rows.len(),
            resolved_entities: outcome.resolved_count,
            pre_resolved_entities: outcome.pre_resolved_count,
            unresolved_entities: outcome.unresolved_count,
            observations_file: observations_file.display().to_string(),
            debug_resolve_file: debug_resolve_file.display().to_string(),
        })
    }

    /// Positional renames: the entity column always, the date column only
    /// when unpivoting (wide output keeps its original date header, if any).
    fn rename_columns(&self, table: Table) -> Result<Table> {
        let table = table.rename_column(self.config.entity_column_index, &self.config.dcid_column)?;
        if self.config.unpivot_variables {
            return table.rename_column(self.config.date_column_index, &self.config.date_column);
        }
        Ok(table)
    }
}
