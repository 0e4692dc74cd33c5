// table.rs

use crate::error::{Result, SubsampleError};
use log::{debug, warn};
use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

/// An in-memory CSV table: header names plus rows of untyped string cells.
///
/// Every row holds exactly one cell per column; the loader rejects ragged input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[cfg(test)]
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        assert!(
            rows.iter().all(|row| row.len() == columns.len()),
            "Table: row width does not match column count"
        );
        Self { columns, rows }
    }

    pub(crate) fn from_csv_path(path: &Path) -> Result<Self> {
        debug!("Opening CSV file: {}", path.display());
        let file = File::open(path).map_err(|e| SubsampleError::io(path, e))?;
        Self::from_csv_reader(BufReader::new(file), path)
    }

    /// `source_path` is only used for error messages.
    pub(crate) fn from_csv_reader<R: Read>(reader: R, source_path: &Path) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()
            .map_err(|e| SubsampleError::csv(source_path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        if columns.is_empty() {
            return Err(SubsampleError::EmptyTable {
                path: source_path.to_path_buf(),
            });
        }

        let duplicates = duplicate_names(&columns);
        if !duplicates.is_empty() {
            warn!(
                "Header of {} repeats column name(s) {:?}; lookups by name use the first occurrence.",
                source_path.display(),
                duplicates
            );
        }

        let mut rows = Vec::new();
        for record_result in csv_reader.records() {
            let record = record_result.map_err(|e| SubsampleError::csv(source_path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(
            "Loaded {} rows x {} columns from {}",
            rows.len(),
            columns.len(),
            source_path.display()
        );
        Ok(Self { columns, rows })
    }

    pub(crate) fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub(crate) fn row(&self, row_idx: usize) -> &[String] {
        &self.rows[row_idx]
    }

    pub(crate) fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| SubsampleError::MissingColumn {
                column: name.to_string(),
                available: self.columns.clone(),
            })
    }

    pub(crate) fn column_indices<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| self.column_index(name.as_ref()))
            .collect()
    }
}

/// Names appearing more than once, in order of their second occurrence.
fn duplicate_names(columns: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for name in columns {
        if !seen.insert(name.as_str()) && !duplicates.contains(&name.as_str()) {
            duplicates.push(name.as_str());
        }
    }
    duplicates
}
