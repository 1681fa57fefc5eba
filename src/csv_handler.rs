use crate::error::{CrateError, Result};
use std::path::Path;

// Loads the raw institution names from the entries CSV.
//
// The column is looked up by header so collaborators can keep whatever other
// columns their export carries; those are ignored. Empty cells are fatal, as
// in the rest of the pipeline there is no way to tell a blank institution
// apart from a truncated row.
pub fn load_institutions(file_path: &Path, column: &str) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let headers = reader.headers()?.clone();

    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| CrateError::MissingHeader(column.to_string()))?;

    let mut names = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row_num = i + 2; // +1 for header, +1 for 0-based index

        let value = record.get(index).map(str::trim).unwrap_or("");
        if value.is_empty() {
            return Err(CrateError::MissingValue {
                column: column.to_string(),
                row: row_num,
            });
        }
        names.push(value.to_string());
    }

    Ok(names)
}
