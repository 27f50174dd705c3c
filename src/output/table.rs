//! CSV input and output
//!
//! The input table is kept whole: every original column survives the round
//! trip, and the email column is appended (or overwritten when the input
//! already has one).

use crate::batch::{InputRow, RowResult};
use crate::config::TableConfig;
use crate::FinderError;
use std::io::{Read, Write};
use std::path::Path;

/// Name of the optional status column
pub const STATUS_COLUMN: &str = "email_status";

/// Name of the optional error column
pub const ERROR_COLUMN: &str = "email_error";

/// An input table with its header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Table {
    /// Index of the column named `name`
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Turns every record into an input row
    ///
    /// # Errors
    ///
    /// `MissingColumn` when the URL column is absent. A missing name column
    /// only yields empty names.
    pub fn input_rows(&self, columns: &TableConfig) -> Result<Vec<InputRow>, FinderError> {
        let url_index = self
            .column(&columns.url_column)
            .ok_or_else(|| FinderError::MissingColumn(columns.url_column.clone()))?;
        let name_index = self.column(&columns.name_column);

        Ok(self
            .records
            .iter()
            .map(|record| {
                let cell = |i: usize| record.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
                InputRow {
                    url: cell(url_index),
                    name: name_index.map(cell).unwrap_or_default(),
                }
            })
            .collect())
    }
}

/// Reads a CSV table with a header row from `path`
pub fn read_table(path: &Path) -> Result<Table, FinderError> {
    let file = std::fs::File::open(path)?;
    read_table_from(file)
}

/// Reads a CSV table with a header row
///
/// Short records are accepted; missing cells read as empty.
pub fn read_table_from<R: Read>(reader: R) -> Result<Table, FinderError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let records = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

    Ok(Table { headers, records })
}

/// Writes the table back to `path` with the results filled in
pub fn write_table(
    path: &Path,
    table: &Table,
    results: &[RowResult],
    columns: &TableConfig,
    with_status: bool,
) -> Result<(), FinderError> {
    let file = std::fs::File::create(path)?;
    write_table_to(file, table, results, columns, with_status)
}

/// Writes the table with the email column (and optionally the status
/// columns) filled from `results`, which must be in table order
pub fn write_table_to<W: Write>(
    writer: W,
    table: &Table,
    results: &[RowResult],
    columns: &TableConfig,
    with_status: bool,
) -> Result<(), FinderError> {
    let mut headers = table.headers.clone();
    let email_index = column_or_append(&mut headers, &columns.email_column);
    let status_indexes = if with_status {
        Some((
            column_or_append(&mut headers, STATUS_COLUMN),
            column_or_append(&mut headers, ERROR_COLUMN),
        ))
    } else {
        None
    };

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&headers)?;

    for (record, result) in table.records.iter().zip(results) {
        let mut out = record.clone();
        out.resize(headers.len(), String::new());
        out[email_index] = result.joined(&columns.separator);
        if let Some((status_index, error_index)) = status_indexes {
            out[status_index] = result.status.to_string();
            out[error_index] = result.error_message();
        }
        writer.write_record(&out)?;
    }

    writer.flush()?;
    Ok(())
}

fn column_or_append(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h.trim() == name) {
        Some(index) => index,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}
