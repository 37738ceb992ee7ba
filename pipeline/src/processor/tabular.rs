use calamine::{Data, Reader, open_workbook_auto_from_rs};
use common::Result;
use std::io::Cursor;

use crate::utils::paths::file_basename;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".csv", ".xlsx", ".xls"];

/// Whether the object name carries one of the supported tabular extensions.
pub fn is_supported(name: &str) -> bool {
    let lower = name.to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Raw tabular content of a source file: a header row plus string cells.
/// Column lookup is by exact header name, matching the legacy loader.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Reads the full tabular content of a source file, dispatching on the file
/// extension: `.csv` via the csv crate, `.xlsx`/`.xls` via calamine.
pub fn read_table(file_name: &str, bytes: &[u8]) -> Result<RawTable> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".csv") {
        read_csv(bytes)
    } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        read_workbook(bytes)
    } else {
        Err(common::Error::UnsupportedFormat(
            file_basename(file_name).to_string(),
        ))
    }
}

fn read_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

fn read_workbook(bytes: &[u8]) -> Result<RawTable> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| common::Error::Parse(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| common::Error::Parse("Workbook has no sheets".to_string()))?
        .map_err(|e| common::Error::Parse(format!("Failed to read worksheet: {}", e)))?;

    let mut row_iter = range.rows();
    let headers = row_iter
        .next()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .unwrap_or_default();

    let rows = row_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Integral floats render without the trailing ".0" Excel gives them
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{:?}", e),
    }
}
