//! Job identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable job identifier in the form `J####`.
///
/// The inner text is kept as read so hand-edited identifiers survive a round trip;
/// [`JobId::number`] reports whether it follows the canonical shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub const PREFIX: char = 'J';

    pub fn from_number(number: u32) -> Self {
        Self(format!("{}{:04}", Self::PREFIX, number))
    }

    /// Normalizes operator input (trimmed, upper-cased).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_ascii_uppercase()))
        }
    }

    /// Keeps persisted text verbatim apart from surrounding whitespace.
    pub fn from_raw(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sequence number for canonical ids.
    pub fn number(&self) -> Option<u32> {
        leading_job_number(&self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads the number from a name that starts with `J` followed by four digits,
/// such as a job folder `J0007 - Kitchen`.
pub fn leading_job_number(name: &str) -> Option<u32> {
    let mut chars = name.chars();
    if chars.next() != Some(JobId::PREFIX) {
        return None;
    }
    let digits: String = chars.take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_number_zero_pads() {
        assert_eq!(JobId::from_number(5).as_str(), "J0005");
        assert_eq!(JobId::from_number(1234).number(), Some(1234));
    }

    #[test]
    fn parse_normalizes_operator_input() {
        assert_eq!(JobId::parse(" j0012 "), Some(JobId::from_number(12)));
        assert_eq!(JobId::parse("   "), None);
    }

    #[test]
    fn leading_number_requires_four_digits() {
        assert_eq!(leading_job_number("J0042 - Deck"), Some(42));
        assert_eq!(leading_job_number("J42"), None);
        assert_eq!(leading_job_number("Archive"), None);
    }
}
