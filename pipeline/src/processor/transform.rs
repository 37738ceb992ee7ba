use common::Result;

use crate::models::CleanedRecord;
use crate::processor::cleaners::{clean_date, clean_phone, clean_text};
use crate::processor::tabular::RawTable;

// Column names as they appear in the source files and the staged CSV.
pub const COL_STUDENT_ID: &str = "StudentID";
pub const COL_STUDENT_NAME: &str = "StudentName";
pub const COL_ADDRESS: &str = "Address";
pub const COL_PHONE: &str = "Phone";
pub const COL_ADMISSION_DATE: &str = "Admission_date";

/// Applies the field cleaners to every row of a raw table. Missing cells
/// (short rows) are treated as absent and normalize to empty values.
pub fn clean_table(table: &RawTable) -> Result<Vec<CleanedRecord>> {
    let id_idx = require_column(table, COL_STUDENT_ID)?;
    let name_idx = require_column(table, COL_STUDENT_NAME)?;
    let address_idx = require_column(table, COL_ADDRESS)?;
    let phone_idx = require_column(table, COL_PHONE)?;
    let date_idx = require_column(table, COL_ADMISSION_DATE)?;

    let records = table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).map(String::as_str);
            CleanedRecord {
                student_id: cell(id_idx).unwrap_or("").to_string(),
                student_name: clean_text(cell(name_idx)),
                address: clean_text(cell(address_idx)),
                phone: clean_phone(cell(phone_idx)),
                admission_date: clean_date(cell(date_idx)),
            }
        })
        .collect();

    Ok(records)
}

fn require_column(table: &RawTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| common::Error::Parse(format!("Missing required column: {}", name)))
}

/// Serializes cleaned records as the staged CSV: header row plus one line
/// per record, absent dates rendered as empty cells.
pub fn to_csv(records: &[CleanedRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        COL_STUDENT_ID,
        COL_STUDENT_NAME,
        COL_ADDRESS,
        COL_PHONE,
        COL_ADMISSION_DATE,
    ])?;

    for record in records {
        let date = record
            .admission_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer.write_record([
            record.student_id.as_str(),
            record.student_name.as_str(),
            record.address.as_str(),
            record.phone.as_str(),
            date.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| common::Error::Other(format!("CSV write error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_table() -> RawTable {
        RawTable {
            headers: vec![
                "StudentID".to_string(),
                "StudentName".to_string(),
                "Address".to_string(),
                "Phone".to_string(),
                "Admission_date".to_string(),
            ],
            rows: vec![
                vec![
                    "1".to_string(),
                    "O'Brien_Smith!!".to_string(),
                    "12, Park #Road".to_string(),
                    "(987) 654-3210".to_string(),
                    "2023/01/05".to_string(),
                ],
                vec![
                    "2".to_string(),
                    "NULL".to_string(),
                    "".to_string(),
                    "9.87654321E9".to_string(),
                    "not a date".to_string(),
                ],
                // short row: trailing cells missing entirely
                vec!["3".to_string(), "Jane".to_string()],
            ],
        }
    }

    #[test]
    fn cleans_designated_columns() {
        let records = clean_table(&sample_table()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].student_name, "OBrien Smith");
        assert_eq!(records[0].address, "12, Park Road");
        assert_eq!(records[0].phone, "9876543210");
        assert_eq!(
            records[0].admission_date,
            Some(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap())
        );

        assert_eq!(records[1].student_name, "");
        assert_eq!(records[1].phone, "9876543210");
        assert_eq!(records[1].admission_date, None);

        assert_eq!(records[2].student_id, "3");
        assert_eq!(records[2].address, "");
        assert_eq!(records[2].phone, "");
        assert_eq!(records[2].admission_date, None);
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let mut table = sample_table();
        table.headers.remove(3);
        let err = clean_table(&table).unwrap_err();
        assert!(matches!(err, common::Error::Parse(_)));
    }

    #[test]
    fn csv_output_keeps_header_and_empty_dates() {
        let records = clean_table(&sample_table()).unwrap();
        let bytes = to_csv(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "StudentID,StudentName,Address,Phone,Admission_date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,OBrien Smith,\"12, Park Road\",9876543210,2023-01-05"
        );
        assert_eq!(lines.next().unwrap(), "2,,,9876543210,");
    }
}
