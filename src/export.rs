use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::CleanRecord;

/// Errors raised while writing exported records
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Jsonl,
}

/// Write records as CSV with a header row and no index column.
///
/// Columns follow record field order. Returns the number of rows written.
pub fn export_to_csv<W: Write>(records: &[CleanRecord], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record(crate::models::Field::ALL.iter().map(|f| f.as_str()))?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

/// Export records to JSONL format, one JSON object per line
pub fn export_to_jsonl<W: Write>(records: &[CleanRecord], writer: &mut W) -> Result<usize, ExportError> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Export records to a file in the requested format
pub fn export_to_file<P: AsRef<Path>>(
    records: &[CleanRecord],
    path: P,
    format: ExportFormat,
) -> Result<usize, ExportError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    let count = match format {
        ExportFormat::Csv => export_to_csv(records, &mut writer)?,
        ExportFormat::Jsonl => export_to_jsonl(records, &mut writer)?,
    };
    tracing::info!(rows = count, path = %path.as_ref().display(), ?format, "Exported records");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::NamedTempFile;

    fn record(title: &str, rating: f64) -> CleanRecord {
        CleanRecord {
            title: title.to_string(),
            price: 1_600_000,
            rating,
            colors: "3".to_string(),
            size: "M".to_string(),
            gender: "Men".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 2, 18, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let mut buffer = Vec::new();
        let count = export_to_csv(&[record("T-shirt 1", 4.5), record("Jacket, Blue", 3.0)], &mut buffer).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Title,Price,Rating,Colors,Size,Gender,Timestamp");
        assert_eq!(lines[1], "T-shirt 1,1600000,4.5,3,M,Men,2025-02-18T10:30:00Z");
        assert!(lines[2].starts_with("\"Jacket, Blue\",1600000,3.0,"));
    }

    #[test]
    fn test_csv_empty_still_has_header() {
        let mut buffer = Vec::new();
        assert_eq!(export_to_csv(&[], &mut buffer).unwrap(), 0);
        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.trim_end(), "Title,Price,Rating,Colors,Size,Gender,Timestamp");
    }

    #[test]
    fn test_jsonl_lines() {
        let mut buffer = Vec::new();
        export_to_jsonl(&[record("A", 4.0), record("B", 2.5)], &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["Title"], "B");
        assert_eq!(parsed["Rating"], 2.5);
        assert_eq!(parsed["Price"], 1_600_000);
    }

    #[test]
    fn test_export_to_file_roundtrips_csv() {
        let temp = NamedTempFile::new().unwrap();
        export_to_file(&[record("A", 4.0)], temp.path(), ExportFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_path(temp.path()).unwrap();
        let rows: Vec<CleanRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows, vec![record("A", 4.0)]);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let result = export_to_file(&[record("A", 4.0)], path, ExportFormat::Csv);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
