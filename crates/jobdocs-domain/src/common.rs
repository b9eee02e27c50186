//! Shared traits and date helpers for document primitives.

use chrono::NaiveDate;

/// External text form for every date the tool reads or writes.
pub const DATE_FORMAT: &str = "%m-%d-%Y";

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Formats a date as `MM-DD-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a strict `MM-DD-YYYY` date, surrounding whitespace allowed.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Sums the amounts of any slice of amounted entities.
pub fn sum_amounts<T: Amounted>(items: &[T]) -> f64 {
    items
        .iter()
        .map(Amounted::amount)
        .fold(0.0, |total, amount| total + amount)
}
