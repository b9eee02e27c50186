//! Print-ready HTML for quotes and invoices.
//!
//! The page is derived from a [`Document`] and never read back; the CSV file stays
//! the source of truth.

use askama::Template;
use jobdocs_config::CompanyProfile;
use jobdocs_domain::{format_date, DocType, Document, LineItem, Receipt};

use crate::currency::{format_money, format_number};

/// Everything outside the document that appears on the page.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub company: &'a CompanyProfile,
    pub notes: &'a [String],
    /// Logo path as referenced from the page, usually a file name in the job folder.
    pub logo_src: Option<&'a str>,
    /// Receipts billed on an invoice. Ignored for quotes.
    pub receipts: &'a [Receipt],
}

/// The quote/invoice page. Askama escapes every interpolated value.
#[derive(Template)]
#[template(path = "document.html")]
struct DocumentPage<'a> {
    title: &'a str,
    summary_label: &'a str,
    company: &'a CompanyProfile,
    has_logo: bool,
    logo_src: &'a str,
    project: &'a str,
    client: &'a str,
    address: &'a str,
    job_id: &'a str,
    date: String,
    rows: Vec<LineRow<'a>>,
    receipts: Vec<ReceiptRow<'a>>,
    subtotal: String,
    /// Blank unless receipts were billed.
    receipts_total: String,
    grand_total: String,
    allowances: Vec<AllowanceRow<'a>>,
    allowances_total: String,
    notes: &'a [String],
}

struct LineRow<'a> {
    /// Set on the first line of each named section.
    starts_section: bool,
    section: &'a str,
    description: &'a str,
    detail_lines: Vec<&'a str>,
    worker_type: &'a str,
    hours: String,
    rate: String,
    total: String,
}

struct ReceiptRow<'a> {
    job_id: &'a str,
    item: &'a str,
    date: &'a str,
    cost: String,
}

struct AllowanceRow<'a> {
    description: &'a str,
    quantity: String,
    unit_cost: String,
    total: String,
}

pub fn render_document(
    document: &Document,
    context: &RenderContext<'_>,
) -> Result<String, askama::Error> {
    let summary_label = match document.doc_type {
        DocType::Quote => "Quote Total",
        DocType::Invoice => "Amount Due",
    };
    let receipts_total = if document.totals.receipts_total > 0.0 {
        format_money(document.totals.receipts_total)
    } else {
        String::new()
    };

    DocumentPage {
        title: document.doc_type.title(),
        summary_label,
        company: context.company,
        has_logo: context.logo_src.is_some(),
        logo_src: context.logo_src.unwrap_or_default(),
        project: &document.project_name,
        client: &document.client_name,
        address: &document.project_address,
        job_id: document.job_id.as_str(),
        date: format_date(document.date),
        rows: line_rows(document),
        receipts: receipt_rows(document, context.receipts),
        subtotal: format_money(document.totals.subtotal),
        receipts_total,
        grand_total: format_money(document.totals.grand_total),
        allowances: allowance_rows(document),
        allowances_total: format_money(document.allowances_total()),
        notes: context.notes,
    }
    .render()
}

fn line_rows(document: &Document) -> Vec<LineRow<'_>> {
    let mut last_section: Option<&str> = None;
    document
        .lines
        .iter()
        .map(|line| {
            let section = line.section.as_str();
            let starts_section = !section.is_empty() && last_section != Some(section);
            if starts_section {
                last_section = Some(section);
            }
            // Details only print on quotes.
            let detail_lines = if document.doc_type == DocType::Quote {
                line.detail.trim().lines().collect()
            } else {
                Vec::new()
            };
            let (hours, rate, total) = price_cells(document, line);
            LineRow {
                starts_section,
                section,
                description: &line.description,
                detail_lines,
                worker_type: &line.worker_type,
                hours,
                rate,
                total,
            }
        })
        .collect()
}

/// Zero values render blank; quote labor shows only its amount.
fn price_cells(document: &Document, line: &LineItem) -> (String, String, String) {
    if document.hides_line_prices() {
        return (String::new(), String::new(), String::new());
    }
    let lump_sum =
        document.doc_type == DocType::Quote && line.worker_type.eq_ignore_ascii_case("labor");
    let hours = if lump_sum || line.quantity == 0.0 {
        String::new()
    } else {
        format_number(line.quantity, 2)
    };
    let rate = if lump_sum || line.unit_rate == 0.0 {
        String::new()
    } else {
        format_money(line.unit_rate)
    };
    let total = match line.line_total() {
        amount if amount == 0.0 => String::new(),
        amount => format_money(amount),
    };
    (hours, rate, total)
}

fn receipt_rows<'a>(document: &Document, receipts: &'a [Receipt]) -> Vec<ReceiptRow<'a>> {
    if document.doc_type != DocType::Invoice {
        return Vec::new();
    }
    receipts
        .iter()
        .map(|receipt| ReceiptRow {
            job_id: &receipt.job_id,
            item: &receipt.item,
            date: &receipt.date,
            cost: format_money(receipt.cost),
        })
        .collect()
}

fn allowance_rows(document: &Document) -> Vec<AllowanceRow<'_>> {
    document
        .allowances
        .iter()
        .map(|allowance| AllowanceRow {
            description: &allowance.description,
            quantity: format_number(allowance.quantity, 2),
            unit_cost: format_money(allowance.unit_cost),
            total: format_money(allowance.total()),
        })
        .collect()
}
