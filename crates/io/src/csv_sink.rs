//! CSV tables for clean records and junk entries.
//!
//! Both tables are append-or-create: an existing table is loaded, its
//! rows are kept in order and the new rows follow. Column names and
//! order are fixed so earlier output stays readable.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use whale_core::config::StorageConfig;
use whale_core::{format_table_date, Error, JunkEntry, Result, TransactionRecord};

/// Header of the records table.
pub const RECORD_COLUMNS: [&str; 8] = [
    "Date",
    "Amount (No.)",
    "Cryptocurrency",
    "Amount ($)",
    "Currency",
    "Action",
    "From",
    "To",
];

/// Header of the junk table.
pub const JUNK_COLUMNS: [&str; 2] = ["Date", "Junk"];

/// Persists the two output tables.
pub trait TabularSink {
    /// Append clean records; returns the number of rows appended.
    fn append_records(&self, records: &[TransactionRecord]) -> Result<usize>;

    /// Append junk entries; returns the number of rows appended.
    fn append_junk(&self, junk: &[JunkEntry]) -> Result<usize>;
}

#[derive(Serialize)]
struct RecordRow<'a> {
    date: String,
    amount_units: &'a str,
    asset: &'a str,
    amount_usd: &'a str,
    currency: &'a str,
    action: &'a str,
    from: &'a str,
    to: Option<&'a str>,
}

impl<'a> From<&'a TransactionRecord> for RecordRow<'a> {
    fn from(r: &'a TransactionRecord) -> Self {
        Self {
            date: format_table_date(&r.timestamp),
            amount_units: &r.amount_units,
            asset: &r.asset,
            amount_usd: &r.amount_usd,
            currency: &r.currency,
            action: &r.action,
            from: &r.from,
            to: r.to.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct JunkRow<'a> {
    date: String,
    junk: &'a str,
}

impl<'a> From<&'a JunkEntry> for JunkRow<'a> {
    fn from(j: &'a JunkEntry) -> Self {
        Self {
            date: format_table_date(&j.timestamp),
            junk: &j.text,
        }
    }
}

/// Read the data rows of an existing table, checking its header.
///
/// An empty input is a table without rows.
pub fn read_rows<R: Read>(reader: R, columns: &[&str]) -> Result<Vec<StringRecord>> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let header = rdr.headers()?.clone();
    if header.is_empty() {
        return Ok(Vec::new());
    }
    if !header.iter().eq(columns.iter().copied()) {
        return Err(Error::storage(format!(
            "unexpected table header {:?}, expected {:?}",
            header.iter().collect::<Vec<_>>(),
            columns
        )));
    }

    let mut rows = Vec::new();
    for row in rdr.records() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write a full table: header, existing rows, then new rows.
fn write_table<W, S, I>(writer: W, columns: &[&str], existing: &[StringRecord], rows: I) -> Result<()>
where
    W: Write,
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(columns)?;
    for row in existing {
        wtr.write_record(row)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the records table.
pub fn write_records<W: Write>(
    writer: W,
    existing: &[StringRecord],
    records: &[TransactionRecord],
) -> Result<()> {
    write_table(writer, &RECORD_COLUMNS, existing, records.iter().map(RecordRow::from))
}

/// Write the junk table.
pub fn write_junk<W: Write>(writer: W, existing: &[StringRecord], junk: &[JunkEntry]) -> Result<()> {
    write_table(writer, &JUNK_COLUMNS, existing, junk.iter().map(JunkRow::from))
}

/// Tabular sink writing CSV files on the local filesystem.
///
/// Assumes a single writer per table.
#[derive(Debug, Clone)]
pub struct CsvSink {
    records_path: PathBuf,
    junk_path: PathBuf,
}

impl CsvSink {
    /// Create a sink writing the two given files.
    pub fn new(records_path: impl Into<PathBuf>, junk_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            junk_path: junk_path.into(),
        }
    }

    /// Create a sink from storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.records_path(), config.junk_path())
    }

    /// Path of the records table.
    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    /// Path of the junk table.
    pub fn junk_path(&self) -> &Path {
        &self.junk_path
    }
}

/// Load `path` if present, rewrite it with `write` through a temporary
/// file, and swap it in. A failed write leaves neither the temporary file
/// nor a changed table behind.
fn rewrite_table<F>(path: &Path, columns: &[&str], write: F) -> Result<usize>
where
    F: FnOnce(File, &[StringRecord]) -> Result<()>,
{
    let existing = if path.exists() {
        read_rows(File::open(path)?, columns)?
    } else {
        Vec::new()
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = File::create(&tmp)
        .map_err(Error::from)
        .and_then(|file| write(file, &existing));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;

    Ok(existing.len())
}

impl TabularSink for CsvSink {
    fn append_records(&self, records: &[TransactionRecord]) -> Result<usize> {
        let kept = rewrite_table(&self.records_path, &RECORD_COLUMNS, |file, existing| {
            write_records(file, existing, records)
        })?;
        info!(
            path = %self.records_path.display(),
            existing = kept,
            appended = records.len(),
            "records table updated"
        );
        Ok(records.len())
    }

    fn append_junk(&self, junk: &[JunkEntry]) -> Result<usize> {
        let kept = rewrite_table(&self.junk_path, &JUNK_COLUMNS, |file, existing| {
            write_junk(file, existing, junk)
        })?;
        info!(
            path = %self.junk_path.display(),
            existing = kept,
            appended = junk.len(),
            "junk table updated"
        );
        Ok(junk.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;
    use whale_core::JunkReason;

    fn make_record(to: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 10, 17, 55, 0).unwrap(),
            amount_units: "1500".to_string(),
            asset: "BTC".to_string(),
            amount_usd: "95000000".to_string(),
            currency: "USD".to_string(),
            action: "transferred".to_string(),
            from: "unknown wallet".to_string(),
            to: to.map(str::to_owned),
        }
    }

    #[test]
    fn test_write_records_fresh() {
        let mut out = Vec::new();
        write_records(&mut out, &[], &[make_record(Some("Coinbase")), make_record(None)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Date,Amount (No.),Cryptocurrency,Amount ($),Currency,Action,From,To"
        );
        assert_eq!(
            lines[1],
            "2024-05-10 17:55:00+00:00,1500,BTC,95000000,USD,transferred,unknown wallet,Coinbase"
        );
        assert_eq!(
            lines[2],
            "2024-05-10 17:55:00+00:00,1500,BTC,95000000,USD,transferred,unknown wallet,"
        );
    }

    #[test]
    fn test_write_junk_keeps_existing_rows_first() {
        let existing = read_rows(
            Cursor::new("Date,Junk\n2024-05-09 10:00:00+00:00,old junk\n"),
            &JUNK_COLUMNS,
        )
        .unwrap();
        let junk = JunkEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap(),
            text: "new junk".to_string(),
            reason: JunkReason::NonNumericQuantity,
        };

        let mut out = Vec::new();
        write_junk(&mut out, &existing, &[junk]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Date,Junk",
                "2024-05-09 10:00:00+00:00,old junk",
                "2024-05-10 09:00:00+00:00,new junk",
            ]
        );
    }

    #[test]
    fn test_read_rows_rejects_foreign_header() {
        let result = read_rows(Cursor::new("a,b\n1,2\n"), &JUNK_COLUMNS);
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[test]
    fn test_failed_rewrite_removes_temp_file() {
        let dir = std::env::temp_dir()
            .join(format!("whale-io-{}-failed-rewrite", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("junk.csv");
        fs::write(&path, "Date,Junk\n2024-05-09 10:00:00+00:00,old junk\n").unwrap();

        let result = rewrite_table(&path, &JUNK_COLUMNS, |mut file, _existing| {
            file.write_all(b"Date,Junk\n")?;
            Err(Error::storage("disk full"))
        });

        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(!dir.join("junk.csv.tmp").exists());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Junk\n2024-05-09 10:00:00+00:00,old junk\n"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_rows_empty_input() {
        assert!(read_rows(Cursor::new(""), &RECORD_COLUMNS).unwrap().is_empty());
    }
}
