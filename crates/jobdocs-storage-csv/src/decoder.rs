//! Block parser for the document CSV layout.
//!
//! Rows are read loosely: header rows are matched by their label in the first
//! column, the line table runs from its `Section` header to the first totals row
//! (or the allowance marker), and the allowance table runs to its total row.
//! Anything unreadable becomes a [`ParseWarning`] and a default value.

use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use jobdocs_core::{parse_number, Decoded, ParseWarning, TotalsService};
use jobdocs_domain::{
    parse_date, AllowanceItem, DocType, Document, JobId, LineItem, PricingMode, TotalSource,
};

use crate::record::{
    ADDRESS_KEY, ALLOWANCE_MARKER, ALLOWANCE_TOTAL_KEY, CLIENT_KEY, DATE_KEY, DOC_TYPE_KEY,
    GRAND_TOTAL_KEY, GRAND_TOTAL_SOURCE_KEY, JOB_ID_KEY, LINE_HEADER, PRICING_KEY, PROJECT_KEY,
    RECEIPTS_TOTAL_KEY, SUBTOTAL_KEY, SUBTOTAL_SOURCE_KEY,
};

/// A non-empty physical row and its 1-based line number in the file.
#[derive(Debug)]
struct Row {
    line: usize,
    cells: Vec<String>,
}

impl Row {
    fn from_record(record: &StringRecord, line: usize) -> Self {
        Self {
            line,
            cells: record.iter().map(str::to_string).collect(),
        }
    }

    fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    fn key(&self) -> &str {
        self.cell(0)
    }

    /// Second cell of a key/value row, if the row has one.
    fn value(&self) -> Option<&str> {
        self.cells.get(1).map(String::as_str)
    }

    fn last(&self) -> &str {
        self.cells.last().map(String::as_str).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    fn ends_line_table(&self) -> bool {
        matches!(self.key(), SUBTOTAL_KEY | GRAND_TOTAL_KEY | ALLOWANCE_MARKER)
    }
}

/// Which provenance rows were present; legacy files have none.
#[derive(Default)]
struct Seen {
    pricing: bool,
    subtotal_source: bool,
    grand_total_source: bool,
}

struct DocumentParser {
    rows: Vec<Row>,
    document: Document,
    warnings: Vec<ParseWarning>,
    seen: Seen,
}

/// Decodes file contents. `today` fills in a missing or unreadable date.
pub fn decode_str(input: &str, today: NaiveDate) -> Decoded {
    decode_bytes(input.as_bytes(), today)
}

pub fn decode_bytes(input: &[u8], today: NaiveDate) -> Decoded {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let line = record
                    .position()
                    .map_or(index + 1, |pos| file_line(input, pos.byte()));
                rows.push(Row::from_record(&record, line));
            }
            Err(err) => warnings.push(ParseWarning::SkippedRow {
                row: err
                    .position()
                    .map_or(index + 1, |pos| file_line(input, pos.byte())),
                reason: err.to_string(),
            }),
        }
    }

    let parser = DocumentParser {
        rows,
        document: Document::empty(today),
        warnings,
        seen: Seen::default(),
    };
    parser.run()
}

/// 1-based file line of the record that starts at or after `byte`.
///
/// The reader reports a record's position where the previous one ended, which
/// is before the `\n` of a CRLF terminator and before any skipped blank lines.
pub(crate) fn file_line(input: &[u8], byte: u64) -> usize {
    let mut start = usize::try_from(byte).unwrap_or(input.len()).min(input.len());
    while matches!(input.get(start), Some(b'\r' | b'\n')) {
        start += 1;
    }
    1 + input[..start].iter().filter(|&&b| b == b'\n').count()
}

impl DocumentParser {
    fn run(mut self) -> Decoded {
        let mut index = 0;
        while index < self.rows.len() {
            let row = &self.rows[index];
            if row.is_blank() {
                index += 1;
                continue;
            }
            match row.key() {
                key if key == LINE_HEADER[0] => {
                    index = self.parse_lines(index + 1);
                    continue;
                }
                ALLOWANCE_MARKER => {
                    // Skip the marker and the column header beneath it.
                    index = self.parse_allowances(index + 2);
                    continue;
                }
                SUBTOTAL_KEY => {
                    let (line, raw) = (row.line, row.last().to_string());
                    self.document.totals.subtotal = self.number(&raw, line, "Subtotal");
                }
                GRAND_TOTAL_KEY => {
                    let (line, raw) = (row.line, row.last().to_string());
                    self.document.totals.grand_total = self.number(&raw, line, "GrandTotal");
                }
                _ => self.apply_header(index),
            }
            index += 1;
        }
        self.resolve_provenance();
        Decoded {
            document: self.document,
            warnings: self.warnings,
        }
    }

    fn apply_header(&mut self, index: usize) {
        let row = &self.rows[index];
        let Some(value) = row.value() else {
            return;
        };
        let (line, key, value) = (row.line, row.key().to_string(), value.to_string());

        match key.as_str() {
            DOC_TYPE_KEY => {
                if let Some(doc_type) = self.parsed::<DocType>(&value, line, "document type") {
                    self.document.doc_type = doc_type;
                }
            }
            JOB_ID_KEY => self.document.job_id = JobId::from_raw(&value),
            PROJECT_KEY => self.document.project_name = value,
            CLIENT_KEY => self.document.client_name = value,
            ADDRESS_KEY => self.document.project_address = value,
            DATE_KEY => match parse_date(&value) {
                Some(date) => self.document.date = date,
                None => self
                    .warnings
                    .push(ParseWarning::InvalidDate { row: line, raw: value }),
            },
            RECEIPTS_TOTAL_KEY => {
                self.document.totals.receipts_total = self.number(&value, line, "ReceiptsTotal");
            }
            PRICING_KEY => {
                if let Some(pricing) = self.parsed::<PricingMode>(&value, line, "pricing mode") {
                    self.document.pricing = pricing;
                    self.seen.pricing = true;
                }
            }
            SUBTOTAL_SOURCE_KEY => {
                if let Some(source) = self.parsed::<TotalSource>(&value, line, "subtotal source") {
                    self.document.totals.subtotal_source = source;
                    self.seen.subtotal_source = true;
                }
            }
            GRAND_TOTAL_SOURCE_KEY => {
                if let Some(source) =
                    self.parsed::<TotalSource>(&value, line, "grand total source")
                {
                    self.document.totals.grand_total_source = source;
                    self.seen.grand_total_source = true;
                }
            }
            _ => {}
        }
    }

    /// Reads line items from `start`; returns the index of the terminating row.
    fn parse_lines(&mut self, start: usize) -> usize {
        let mut index = start;
        while index < self.rows.len() {
            let row = &self.rows[index];
            if row.ends_line_table() {
                break;
            }
            if row.is_blank() {
                index += 1;
                continue;
            }
            let line = row.line;
            let (raw_quantity, raw_rate) = (row.cell(4).to_string(), row.cell(5).to_string());
            let mut item = LineItem::new(row.cell(1), row.cell(3), 0.0, 0.0)
                .with_section(row.cell(0))
                .with_detail(row.cell(2));
            item.quantity = self.number(&raw_quantity, line, LINE_HEADER[4]);
            item.unit_rate = self.number(&raw_rate, line, LINE_HEADER[5]);
            self.document.lines.push(item);
            index += 1;
        }
        index
    }

    /// Reads allowances from `start`; returns the index just past the total row.
    fn parse_allowances(&mut self, start: usize) -> usize {
        let mut index = start;
        while index < self.rows.len() {
            let row = &self.rows[index];
            if row.key() == ALLOWANCE_TOTAL_KEY {
                return index + 1;
            }
            if row.is_blank() {
                index += 1;
                continue;
            }
            let (line, description) = (row.line, row.cell(0).to_string());
            let (raw_quantity, raw_cost) = (row.cell(1).to_string(), row.cell(2).to_string());
            let quantity = self.number(&raw_quantity, line, "Quantity");
            let unit_cost = self.number(&raw_cost, line, "EstUnitCost");
            self.document
                .allowances
                .push(AllowanceItem::new(description, quantity, unit_cost));
            index += 1;
        }
        index
    }

    fn resolve_provenance(&mut self) {
        let document = &mut self.document;
        if !self.seen.pricing {
            document.pricing = TotalsService::infer_pricing(&document.lines);
        }
        let (subtotal_source, grand_total_source) =
            TotalsService::infer_sources(document.pricing, &document.lines, &document.totals);
        if !self.seen.subtotal_source {
            document.totals.subtotal_source = subtotal_source;
        }
        if !self.seen.grand_total_source {
            document.totals.grand_total_source = grand_total_source;
        }
    }

    fn number(&mut self, raw: &str, row: usize, field: &'static str) -> f64 {
        match parse_number(raw, row, field) {
            Ok(value) => value,
            Err(warning) => {
                self.warnings.push(warning);
                0.0
            }
        }
    }

    fn parsed<T: FromStr>(&mut self, raw: &str, row: usize, field: &'static str) -> Option<T> {
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.warnings.push(ParseWarning::InvalidValue {
                    row,
                    field,
                    raw: raw.to_string(),
                });
                None
            }
        }
    }
}
