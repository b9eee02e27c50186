//! Per-job receipts ledgers (`<JobID>_receipts.csv`).

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use jobdocs_core::{parse_money, CoreError, ParseWarning};
use jobdocs_domain::{parse_date, JobId, Receipt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{decoder::file_line, write_atomic};

const RECEIPTS_MARKER: &str = "receipts";
const DATE_COLUMN: &str = "Date";
const ITEM_COLUMN: &str = "Item";

#[derive(Debug, Serialize)]
struct ReceiptRecord {
    #[serde(rename = "JobID")]
    job_id: String,
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Cost")]
    cost: f64,
}

impl From<&Receipt> for ReceiptRecord {
    fn from(receipt: &Receipt) -> Self {
        Self {
            job_id: receipt.job_id.clone(),
            item: receipt.item.clone(),
            date: receipt.date.clone(),
            cost: receipt.cost,
        }
    }
}

/// A ledger row as read back; the cost stays text until it is checked.
#[derive(Debug, Deserialize)]
struct StoredReceipt {
    #[serde(rename = "JobID")]
    job_id: String,
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Cost", default)]
    cost: String,
}

/// Receipts read from a ledger plus the rows that had to be skipped.
#[derive(Debug, Default)]
pub struct LoadedReceipts {
    pub receipts: Vec<Receipt>,
    pub warnings: Vec<ParseWarning>,
}

/// One receipts CSV file.
#[derive(Debug, Clone)]
pub struct ReceiptLedger {
    path: PathBuf,
}

impl ReceiptLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the column header first when the file is new.
    pub fn append(&self, receipt: &Receipt) -> Result<(), CoreError> {
        let is_new = fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(is_new)
            .terminator(Terminator::CRLF)
            .from_writer(file);
        writer
            .serialize(ReceiptRecord::from(receipt))
            .map_err(|err| CoreError::Csv(format!("failed to append receipt: {err}")))?;
        writer.flush()?;
        debug!(path = %self.path.display(), item = %receipt.item, "appended receipt");
        Ok(())
    }

    /// Reads every row that has the ledger columns; the rest are reported as
    /// skipped. A cost that is not a number is read as 0.0 with a warning.
    pub fn load(&self) -> Result<LoadedReceipts, CoreError> {
        if !self.path.exists() {
            return Ok(LoadedReceipts {
                receipts: Vec::new(),
                warnings: vec![ParseWarning::MissingFile {
                    path: self.path.clone(),
                }],
            });
        }

        let data = fs::read(&self.path)?;
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(data.as_slice());
        let headers = reader
            .headers()
            .map_err(|err| CoreError::Csv(format!("failed to read receipts: {err}")))?
            .clone();

        let mut loaded = LoadedReceipts::default();
        for (index, result) in reader.records().enumerate() {
            let fallback = index + 2;
            let parsed = result.and_then(|record| {
                let row = record
                    .position()
                    .map_or(fallback, |pos| file_line(&data, pos.byte()));
                record
                    .deserialize::<StoredReceipt>(Some(&headers))
                    .map(|stored| (row, stored))
            });
            match parsed {
                Ok((row, stored)) => {
                    let cost = match parse_money(&stored.cost, row, "Cost") {
                        Ok(cost) => cost,
                        Err(warning) => {
                            warn!(path = %self.path.display(), row, "unreadable receipt cost");
                            loaded.warnings.push(warning);
                            0.0
                        }
                    };
                    loaded
                        .receipts
                        .push(Receipt::new(stored.job_id, stored.item, stored.date, cost));
                }
                Err(err) => {
                    let row = err
                        .position()
                        .map_or(fallback, |pos| file_line(&data, pos.byte()));
                    warn!(path = %self.path.display(), row, "skipping receipt row: {err}");
                    loaded.warnings.push(ParseWarning::SkippedRow {
                        row,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(loaded)
    }

    /// Re-sorts the file by (date, item); rows with unreadable dates go last.
    ///
    /// Rows are kept verbatim, including ones [`ReceiptLedger::load`] would skip.
    /// Returns the number of rows written.
    pub fn reorganize(&self) -> Result<usize, CoreError> {
        if !self.path.exists() {
            return Ok(0);
        }
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|err| CoreError::Csv(format!("failed to open receipts: {err}")))?;
        let headers = reader
            .headers()
            .map_err(|err| CoreError::Csv(err.to_string()))?
            .clone();
        let mut rows = reader
            .records()
            .collect::<Result<Vec<StringRecord>, _>>()
            .map_err(|err| CoreError::Csv(format!("failed to read receipts: {err}")))?;
        if rows.is_empty() {
            return Ok(0);
        }

        let date_column = headers.iter().position(|name| name.trim() == DATE_COLUMN);
        let item_column = headers.iter().position(|name| name.trim() == ITEM_COLUMN);
        let sort_key = |row: &StringRecord| -> (NaiveDate, String) {
            let date = date_column
                .and_then(|column| row.get(column))
                .and_then(parse_date)
                .unwrap_or(NaiveDate::MAX);
            let item = item_column
                .and_then(|column| row.get(column))
                .map(|item| item.trim().to_string())
                .unwrap_or_default();
            (date, item)
        };
        rows.sort_by_cached_key(sort_key);

        let mut writer = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());
        writer
            .write_record(&headers)
            .map_err(|err| CoreError::Csv(err.to_string()))?;
        for row in &rows {
            writer
                .write_record(row)
                .map_err(|err| CoreError::Csv(err.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| CoreError::Csv(err.to_string()))?;
        let data = String::from_utf8(bytes).map_err(|err| CoreError::Csv(err.to_string()))?;
        write_atomic(&self.path, &data)?;
        debug!(path = %self.path.display(), rows = rows.len(), "reorganized receipts");
        Ok(rows.len())
    }
}

/// Receipts files for `job_id` in `dir`, sorted by name.
pub fn receipt_files(dir: &Path, job_id: &JobId) -> Result<Vec<PathBuf>, CoreError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let lower = name.to_lowercase();
        if lower.ends_with(".csv")
            && lower.contains(RECEIPTS_MARKER)
            && name.starts_with(job_id.as_str())
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// First free name among `<JobID>_receipts.csv`, `<JobID>_receipts_2.csv`, ...
pub fn new_receipts_path(dir: &Path, job_id: &JobId) -> PathBuf {
    let base = dir.join(format!("{job_id}_{RECEIPTS_MARKER}.csv"));
    if !base.exists() {
        return base;
    }
    (2..)
        .map(|n| dir.join(format!("{job_id}_{RECEIPTS_MARKER}_{n}.csv")))
        .find(|path| !path.exists())
        .unwrap_or(base)
}
