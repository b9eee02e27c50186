use csv::{Terminator, WriterBuilder};
use jobdocs_core::CoreError;
use jobdocs_domain::{format_date, Document};

use crate::record::{
    format_number, Record, ADDRESS_KEY, CLIENT_KEY, DATE_KEY, DOC_TYPE_KEY, GRAND_TOTAL_KEY,
    GRAND_TOTAL_SOURCE_KEY, JOB_ID_KEY, PRICING_KEY, PROJECT_KEY, RECEIPTS_TOTAL_KEY,
    SUBTOTAL_KEY, SUBTOTAL_SOURCE_KEY,
};

const LINE_TERMINATOR: &str = "\r\n";

/// Lays a document out as the ordered record sequence of its CSV file.
pub fn encode_records(document: &Document) -> Vec<Record> {
    let header = |key: &'static str, value: String| Record::Header { key, value };
    let totals = &document.totals;

    let mut records = vec![
        header(DOC_TYPE_KEY, document.doc_type.as_str().to_string()),
        header(JOB_ID_KEY, document.job_id.to_string()),
        header(PROJECT_KEY, document.project_name.clone()),
        header(CLIENT_KEY, document.client_name.clone()),
        header(ADDRESS_KEY, document.project_address.clone()),
        header(DATE_KEY, format_date(document.date)),
        header(RECEIPTS_TOTAL_KEY, format_number(totals.receipts_total)),
        header(PRICING_KEY, document.pricing.as_str().to_string()),
        header(SUBTOTAL_SOURCE_KEY, totals.subtotal_source.as_str().to_string()),
        header(
            GRAND_TOTAL_SOURCE_KEY,
            totals.grand_total_source.as_str().to_string(),
        ),
        Record::Blank,
        Record::LineItemHeader,
    ];
    records.extend(document.lines.iter().cloned().map(Record::LineItemRow));
    records.push(Record::Blank);
    records.push(Record::TotalsRow {
        key: SUBTOTAL_KEY,
        value: totals.subtotal,
    });
    records.push(Record::TotalsRow {
        key: GRAND_TOTAL_KEY,
        value: totals.grand_total,
    });

    if !document.allowances.is_empty() {
        records.push(Record::Blank);
        records.push(Record::AllowanceMarker);
        records.push(Record::AllowanceHeader);
        records.extend(document.allowances.iter().cloned().map(Record::AllowanceRow));
        records.push(Record::AllowanceTotal(document.allowances_total()));
    }
    records
}

/// Renders the full file contents, CRLF-terminated and minimally quoted.
pub fn encode_document(document: &Document) -> Result<String, CoreError> {
    let mut out = String::new();
    for record in encode_records(document) {
        match record {
            // csv writes an empty record as `""`; a separator must be a bare line break.
            Record::Blank => out.push_str(LINE_TERMINATOR),
            other => out.push_str(&encode_row(&other.fields())?),
        }
    }
    Ok(out)
}

fn encode_row(fields: &[String]) -> Result<String, CoreError> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer
        .write_record(fields)
        .map_err(|err| CoreError::Csv(format!("failed to write row: {err}")))?;
    let bytes = writer
        .into_inner()
        .map_err(|err| CoreError::Csv(format!("failed to flush row: {err}")))?;
    String::from_utf8(bytes).map_err(|err| CoreError::Csv(err.to_string()))
}
