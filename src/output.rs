// output.rs

use crate::error::{Result, SubsampleError};
use crate::table::Table;
use std::path::{Path, PathBuf};

pub(crate) const ROW_ID_COLUMN: &str = "RowID";

pub(crate) fn replicate_file_path(output_dir: &Path, replicate: usize) -> PathBuf {
    output_dir.join(format!("sample{}.csv", replicate))
}

/// Writes one replicate: a `RowID` column (0-based, contiguous) followed by
/// the selected columns of every row in `row_indices`, in that order.
pub(crate) fn write_replicate(
    path: &Path,
    table: &Table,
    row_indices: &[usize],
    column_indices: &[usize],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| SubsampleError::csv(path, e))?;

    let header = std::iter::once(ROW_ID_COLUMN)
        .chain(column_indices.iter().map(|&c| table.columns()[c].as_str()));
    writer
        .write_record(header)
        .map_err(|e| SubsampleError::csv(path, e))?;

    for (row_id, &row_idx) in row_indices.iter().enumerate() {
        let row = table.row(row_idx);
        let row_id_field = row_id.to_string();
        let record = std::iter::once(row_id_field.as_str())
            .chain(column_indices.iter().map(|&c| row[c].as_str()));
        writer
            .write_record(record)
            .map_err(|e| SubsampleError::csv(path, e))?;
    }

    writer.flush().map_err(|e| SubsampleError::io(path, e))?;
    Ok(())
}
