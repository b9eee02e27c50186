//! Quote and invoice documents.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    common::{format_date, sum_amounts, Displayable},
    job::JobId,
    line_item::{AllowanceItem, LineItem},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    #[default]
    Quote,
    Invoice,
}

impl DocType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Quote => "quote",
            DocType::Invoice => "invoice",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DocType::Quote => "Quote",
            DocType::Invoice => "Invoice",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quote" => Ok(DocType::Quote),
            "invoice" => Ok(DocType::Invoice),
            other => Err(format!("unknown document type `{other}`")),
        }
    }
}

/// How the subtotal of a document is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Line totals roll up into the subtotal.
    #[default]
    Standard,
    /// Lines describe scope only; the subtotal is entered by hand.
    Fixed,
}

impl PricingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PricingMode::Standard => "standard",
            PricingMode::Fixed => "fixed",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(PricingMode::Standard),
            "fixed" => Ok(PricingMode::Fixed),
            other => Err(format!("unknown pricing mode `{other}`")),
        }
    }
}

/// Records whether a total was derived or typed in by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TotalSource {
    #[default]
    Computed,
    Manual,
}

impl TotalSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TotalSource::Computed => "computed",
            TotalSource::Manual => "manual",
        }
    }

    pub fn is_manual(self) -> bool {
        matches!(self, TotalSource::Manual)
    }
}

impl fmt::Display for TotalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TotalSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "computed" => Ok(TotalSource::Computed),
            "manual" => Ok(TotalSource::Manual),
            other => Err(format!("unknown total source `{other}`")),
        }
    }
}

/// Contractor totals. Allowances are never part of these figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub receipts_total: f64,
    pub grand_total: f64,
    #[serde(default)]
    pub subtotal_source: TotalSource,
    #[serde(default)]
    pub grand_total_source: TotalSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_type: DocType,
    pub job_id: JobId,
    pub project_name: String,
    pub client_name: String,
    pub project_address: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub pricing: PricingMode,
    pub lines: Vec<LineItem>,
    pub totals: Totals,
    #[serde(default)]
    pub allowances: Vec<AllowanceItem>,
}

impl Document {
    pub fn new(doc_type: DocType, job_id: JobId, date: NaiveDate) -> Self {
        Self {
            doc_type,
            job_id,
            project_name: String::new(),
            client_name: String::new(),
            project_address: String::new(),
            date,
            pricing: PricingMode::Standard,
            lines: Vec::new(),
            totals: Totals::default(),
            allowances: Vec::new(),
        }
    }

    /// Empty quote dated `today`, used when nothing could be loaded.
    pub fn empty(today: NaiveDate) -> Self {
        Self::new(DocType::Quote, JobId::default(), today)
    }

    pub fn allowances_total(&self) -> f64 {
        sum_amounts(&self.allowances)
    }

    /// True when line prices carry no information and should not be shown.
    pub fn hides_line_prices(&self) -> bool {
        self.pricing == PricingMode::Fixed
    }
}

impl Displayable for Document {
    fn display_label(&self) -> String {
        format!(
            "{} {} [{}] {}",
            self.job_id,
            self.doc_type,
            format_date(self.date),
            self.project_name
        )
    }
}
