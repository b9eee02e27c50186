use std::collections::BTreeSet;

use chrono::NaiveDate;
use jobdocs_domain::{sum_amounts, Receipt};

use crate::CoreError;

/// Which logged receipts to bill on an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptSelection {
    All,
    /// Inclusive on both ends.
    DateRange { start: NaiveDate, end: NaiveDate },
    /// One-based line numbers as listed to the operator.
    Lines(Vec<usize>),
}

pub struct ReceiptService;

impl ReceiptService {
    /// Orders by date then item; rows with unreadable dates sink to the bottom.
    pub fn sort(receipts: &mut [Receipt]) {
        receipts.sort_by(|a, b| {
            let key_a = (a.parsed_date().unwrap_or(NaiveDate::MAX), a.item.trim());
            let key_b = (b.parsed_date().unwrap_or(NaiveDate::MAX), b.item.trim());
            key_a.cmp(&key_b)
        });
    }

    pub fn filter_by_date(
        receipts: &[Receipt],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Receipt>, CoreError> {
        if end < start {
            return Err(CoreError::Validation(
                "end date is before start date".into(),
            ));
        }
        Ok(receipts
            .iter()
            .filter(|receipt| {
                receipt
                    .parsed_date()
                    .is_some_and(|date| start <= date && date <= end)
            })
            .cloned()
            .collect())
    }

    /// Parses selections like `1,3,5-7` against a list of `len` lines. Malformed
    /// parts and reversed ranges are ignored, and ranges are clipped to `1..=len`;
    /// the result is de-duplicated and ascending.
    pub fn parse_line_selection(raw: &str, len: usize) -> Vec<usize> {
        let mut selected = BTreeSet::new();
        for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    if let (Ok(start), Ok(end)) =
                        (start.trim().parse::<usize>(), end.trim().parse::<usize>())
                    {
                        if start <= end {
                            selected.extend(start.max(1)..=end.min(len));
                        }
                    }
                }
                None => {
                    if let Ok(number) = part.parse::<usize>() {
                        if (1..=len).contains(&number) {
                            selected.insert(number);
                        }
                    }
                }
            }
        }
        selected.into_iter().collect()
    }

    /// Picks receipts by one-based line number; numbers outside the list are dropped.
    pub fn select_lines(receipts: &[Receipt], lines: &[usize]) -> Vec<Receipt> {
        let wanted: BTreeSet<usize> = lines.iter().copied().collect();
        wanted
            .into_iter()
            .filter(|&line| line >= 1 && line <= receipts.len())
            .map(|line| receipts[line - 1].clone())
            .collect()
    }

    pub fn select(
        receipts: &[Receipt],
        selection: &ReceiptSelection,
    ) -> Result<Vec<Receipt>, CoreError> {
        match selection {
            ReceiptSelection::All => Ok(receipts.to_vec()),
            ReceiptSelection::DateRange { start, end } => {
                Self::filter_by_date(receipts, *start, *end)
            }
            ReceiptSelection::Lines(lines) => Ok(Self::select_lines(receipts, lines)),
        }
    }

    pub fn total(receipts: &[Receipt]) -> f64 {
        sum_amounts(receipts)
    }
}
