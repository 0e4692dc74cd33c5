// config.rs

use crate::error::Result;
use crate::table::Table;
use std::path::PathBuf;

pub(crate) const DEFAULT_TREATMENT_COLUMN: &str = "Treatment";

/// Resolved run configuration. Built once from the command line.
#[derive(Debug, Clone)]
pub(crate) struct SubsampleConfig {
    pub(crate) csv_path: PathBuf,
    /// Accepted for compatibility; output files are always named `sample<N>.csv`.
    pub(crate) output_prefix: String,
    pub(crate) output_dir: PathBuf,
    pub(crate) treatment_columns: Vec<String>,
    pub(crate) replicate_count: usize,
    pub(crate) sample_size: usize,
    /// `None` selects every input column.
    pub(crate) output_columns: Option<Vec<String>>,
    pub(crate) seed: Option<u64>,
}

impl SubsampleConfig {
    /// Positions of the columns to write, in output order.
    pub(crate) fn resolve_output_columns(&self, table: &Table) -> Result<Vec<usize>> {
        match &self.output_columns {
            Some(names) => table.column_indices(names),
            None => Ok((0..table.columns().len()).collect()),
        }
    }
}
