//! Row kinds of the document CSV layout.
//!
//! A document file is a flat sequence of records:
//!
//! ```text
//! DocType,quote
//! JobID,J0007
//! ...
//! ReceiptsTotal,0.0
//! Pricing,standard
//! SubtotalSource,computed
//! GrandTotalSource,computed
//!
//! Section,Description,FullDescription,WorkerType,Hours/Qty,Rate/UnitPrice,LineTotal
//! Interior,Demo,,Labor,1.0,500.0,500.0
//!
//! Subtotal,,,,,,500.0
//! GrandTotal,,,,,,500.0
//!
//! Owner Allowances (client purchases directly)
//! Description,Quantity,EstUnitCost,EstTotal
//! Vanity,1.0,1200.0,1200.0
//! OwnerAllowancesTotal,,,,1200.0
//! ```

use jobdocs_domain::{AllowanceItem, LineItem};

pub const DOC_TYPE_KEY: &str = "DocType";
pub const JOB_ID_KEY: &str = "JobID";
pub const PROJECT_KEY: &str = "Project";
pub const CLIENT_KEY: &str = "Client";
pub const ADDRESS_KEY: &str = "Address";
pub const DATE_KEY: &str = "Date";
pub const RECEIPTS_TOTAL_KEY: &str = "ReceiptsTotal";
pub const PRICING_KEY: &str = "Pricing";
pub const SUBTOTAL_SOURCE_KEY: &str = "SubtotalSource";
pub const GRAND_TOTAL_SOURCE_KEY: &str = "GrandTotalSource";

pub const SUBTOTAL_KEY: &str = "Subtotal";
pub const GRAND_TOTAL_KEY: &str = "GrandTotal";

pub const LINE_HEADER: [&str; 7] = [
    "Section",
    "Description",
    "FullDescription",
    "WorkerType",
    "Hours/Qty",
    "Rate/UnitPrice",
    "LineTotal",
];

pub const ALLOWANCE_MARKER: &str = "Owner Allowances (client purchases directly)";
pub const ALLOWANCE_HEADER: [&str; 4] = ["Description", "Quantity", "EstUnitCost", "EstTotal"];
pub const ALLOWANCE_TOTAL_KEY: &str = "OwnerAllowancesTotal";

/// Column carrying the value of a `Subtotal`/`GrandTotal` row.
pub const TOTALS_VALUE_COLUMN: usize = 6;
/// Column carrying the value of the `OwnerAllowancesTotal` row.
pub const ALLOWANCE_TOTAL_COLUMN: usize = 4;

/// One physical row of a document file.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Header { key: &'static str, value: String },
    LineItemHeader,
    LineItemRow(LineItem),
    TotalsRow { key: &'static str, value: f64 },
    AllowanceMarker,
    AllowanceHeader,
    AllowanceRow(AllowanceItem),
    AllowanceTotal(f64),
    Blank,
}

impl Record {
    /// Cells as written. `Blank` has none.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Record::Header { key, value } => vec![key.to_string(), value.clone()],
            Record::LineItemHeader => LINE_HEADER.iter().map(|s| s.to_string()).collect(),
            Record::LineItemRow(line) => vec![
                line.section.clone(),
                line.description.clone(),
                line.detail.clone(),
                line.worker_type.clone(),
                format_number(line.quantity),
                format_number(line.unit_rate),
                format_number(line.line_total()),
            ],
            Record::TotalsRow { key, value } => padded(key, TOTALS_VALUE_COLUMN, *value),
            Record::AllowanceMarker => vec![ALLOWANCE_MARKER.to_string()],
            Record::AllowanceHeader => ALLOWANCE_HEADER.iter().map(|s| s.to_string()).collect(),
            Record::AllowanceRow(item) => vec![
                item.description.clone(),
                format_number(item.quantity),
                format_number(item.unit_cost),
                format_number(item.total()),
            ],
            Record::AllowanceTotal(total) => {
                padded(ALLOWANCE_TOTAL_KEY, ALLOWANCE_TOTAL_COLUMN, *total)
            }
            Record::Blank => Vec::new(),
        }
    }
}

/// Formats a number so it parses back to the same `f64`.
///
/// Integral values keep one decimal place (`500.0`); everything else uses the
/// shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn padded(key: &str, column: usize, value: f64) -> Vec<String> {
    let mut cells = vec![String::new(); column + 1];
    cells[0] = key.to_string();
    cells[column] = format_number(value);
    cells
}
