use std::path::Path;

use jobdocs_domain::{Document, PricingMode};

use crate::{CoreError, DecodeMode, Decoded, TotalsService};

/// Abstraction over persistence backends capable of storing documents.
pub trait DocumentStorage {
    /// Writes the whole document, replacing anything already at `path`.
    fn save_document(&self, document: &Document, path: &Path) -> Result<(), CoreError>;

    /// Reads a document back. A missing file is a warning, not an error, in lenient mode.
    fn load_document(&self, path: &Path, mode: DecodeMode) -> Result<Decoded, CoreError>;
}

/// Detects inconsistencies an operator should know about before re-saving.
pub fn document_warnings(document: &Document) -> Vec<String> {
    let mut warnings = Vec::new();

    if document.job_id.is_empty() {
        warnings.push("document has no job id".to_string());
    } else if document.job_id.number().is_none() {
        warnings.push(format!(
            "job id `{}` does not follow the J#### pattern",
            document.job_id
        ));
    }

    for (index, line) in document.lines.iter().enumerate() {
        if line.description.trim().is_empty() {
            warnings.push(format!("line {} has no description", index + 1));
        }
        if line.quantity < 0.0 || line.unit_rate < 0.0 {
            warnings.push(format!(
                "line {} ({}) has a negative quantity or rate",
                index + 1,
                line.description
            ));
        }
        if document.pricing == PricingMode::Fixed && !line.is_scope_only() {
            warnings.push(format!(
                "line {} ({}) carries prices in a fixed-price document",
                index + 1,
                line.description
            ));
        }
    }

    if document.totals.subtotal_source.is_manual() && document.pricing == PricingMode::Standard {
        let summed = TotalsService::line_subtotal(&document.lines);
        warnings.push(format!(
            "subtotal {:.2} was entered manually (lines sum to {:.2})",
            document.totals.subtotal, summed
        ));
    }
    if document.totals.grand_total_source.is_manual() {
        warnings.push(format!(
            "grand total {:.2} was entered manually",
            document.totals.grand_total
        ));
    }

    warnings
}
