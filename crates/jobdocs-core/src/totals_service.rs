use jobdocs_domain::{
    sum_amounts, AllowanceItem, Document, LineItem, PricingMode, TotalSource, Totals,
};

use crate::CoreError;

/// Values closer than this are treated as equal when inferring provenance.
const PROVENANCE_TOLERANCE: f64 = 1e-6;

pub struct TotalsService;

impl TotalsService {
    /// Sum of every line total, in plain `f64` accumulation.
    pub fn line_subtotal(lines: &[LineItem]) -> f64 {
        sum_amounts(lines)
    }

    /// Standard pricing: the subtotal rolls up from the lines.
    pub fn standard(lines: &[LineItem], receipts_total: f64) -> Totals {
        let subtotal = Self::line_subtotal(lines);
        Totals {
            subtotal,
            receipts_total,
            grand_total: subtotal + receipts_total,
            subtotal_source: TotalSource::Computed,
            grand_total_source: TotalSource::Computed,
        }
    }

    /// Fixed pricing: the subtotal is whatever the operator entered.
    pub fn fixed(subtotal: f64, receipts_total: f64) -> Totals {
        Totals {
            subtotal,
            receipts_total,
            grand_total: subtotal + receipts_total,
            subtotal_source: TotalSource::Manual,
            grand_total_source: TotalSource::Computed,
        }
    }

    pub fn for_pricing(
        pricing: PricingMode,
        lines: &[LineItem],
        receipts_total: f64,
        fixed_subtotal: Option<f64>,
    ) -> Result<Totals, CoreError> {
        match (pricing, fixed_subtotal) {
            (PricingMode::Standard, _) => Ok(Self::standard(lines, receipts_total)),
            (PricingMode::Fixed, Some(subtotal)) => {
                validate_amount("fixed subtotal", subtotal)?;
                Ok(Self::fixed(subtotal, receipts_total))
            }
            (PricingMode::Fixed, None) => Err(CoreError::Validation(
                "fixed pricing requires a subtotal".into(),
            )),
        }
    }

    /// Re-derives computed totals from the document's current lines.
    /// Manual values are left exactly as they are.
    pub fn recalculate(document: &mut Document) {
        let totals = &mut document.totals;
        if !totals.subtotal_source.is_manual() {
            totals.subtotal = Self::line_subtotal(&document.lines);
        }
        Self::refresh_grand_total(totals);
    }

    pub fn set_receipts_total(totals: &mut Totals, receipts_total: f64) {
        totals.receipts_total = receipts_total;
        Self::refresh_grand_total(totals);
    }

    pub fn override_subtotal(totals: &mut Totals, subtotal: f64) {
        totals.subtotal = subtotal;
        totals.subtotal_source = TotalSource::Manual;
        Self::refresh_grand_total(totals);
    }

    pub fn override_grand_total(totals: &mut Totals, grand_total: f64) {
        totals.grand_total = grand_total;
        totals.grand_total_source = TotalSource::Manual;
    }

    /// Drops any grand-total override and derives it again.
    pub fn auto_grand_total(totals: &mut Totals) {
        totals.grand_total_source = TotalSource::Computed;
        Self::refresh_grand_total(totals);
    }

    /// Disclosure-only figure; never folded into the contractor totals.
    pub fn allowances_total(allowances: &[AllowanceItem]) -> f64 {
        sum_amounts(allowances)
    }

    /// Best guess at provenance for files written before it was recorded.
    pub fn infer_sources(
        pricing: PricingMode,
        lines: &[LineItem],
        totals: &Totals,
    ) -> (TotalSource, TotalSource) {
        let subtotal_source = if pricing == PricingMode::Fixed
            || !approx_eq(totals.subtotal, Self::line_subtotal(lines))
        {
            TotalSource::Manual
        } else {
            TotalSource::Computed
        };
        let grand_total_source =
            if approx_eq(totals.grand_total, totals.subtotal + totals.receipts_total) {
                TotalSource::Computed
            } else {
                TotalSource::Manual
            };
        (subtotal_source, grand_total_source)
    }

    /// Fixed when every line is scope-only; an empty document counts as standard.
    pub fn infer_pricing(lines: &[LineItem]) -> PricingMode {
        if !lines.is_empty() && lines.iter().all(LineItem::is_scope_only) {
            PricingMode::Fixed
        } else {
            PricingMode::Standard
        }
    }

    fn refresh_grand_total(totals: &mut Totals) {
        if !totals.grand_total_source.is_manual() {
            totals.grand_total = totals.subtotal + totals.receipts_total;
        }
    }
}

pub(crate) fn validate_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() <= PROVENANCE_TOLERANCE * left.abs().max(right.abs()).max(1.0)
}
