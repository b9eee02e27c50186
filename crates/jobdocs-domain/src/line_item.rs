//! Line items and owner allowances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{Amounted, Displayable};

/// One priced or scope-only row of a quote or invoice.
///
/// `quantity` holds hours for labor and a count for materials. The line total is
/// always derived from `quantity * unit_rate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub section: String,
    pub description: String,
    #[serde(default)]
    pub detail: String,
    pub worker_type: String,
    pub quantity: f64,
    pub unit_rate: f64,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        worker_type: impl Into<String>,
        quantity: f64,
        unit_rate: f64,
    ) -> Self {
        Self {
            section: String::new(),
            description: description.into(),
            detail: String::new(),
            worker_type: worker_type.into(),
            quantity,
            unit_rate,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_rate
    }

    /// True for fixed-price lines that only describe scope.
    pub fn is_scope_only(&self) -> bool {
        self.quantity == 0.0 && self.unit_rate == 0.0
    }
}

impl Amounted for LineItem {
    fn amount(&self) -> f64 {
        self.line_total()
    }
}

impl Displayable for LineItem {
    fn display_label(&self) -> String {
        format!("{} ({})", self.description, self.worker_type)
    }
}

/// An item the client purchases directly. Shown for disclosure, never billed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowanceItem {
    pub description: String,
    pub quantity: f64,
    pub unit_cost: f64,
}

impl AllowanceItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_cost: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_cost,
        }
    }

    pub fn total(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

impl Amounted for AllowanceItem {
    fn amount(&self) -> f64 {
        self.total()
    }
}

/// Labels offered for the Worker / Type column of quote lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuoteLabel {
    #[default]
    Labor,
    Material,
    LaborAndMaterial,
}

impl QuoteLabel {
    pub const ALL: [QuoteLabel; 3] = [
        QuoteLabel::Labor,
        QuoteLabel::Material,
        QuoteLabel::LaborAndMaterial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuoteLabel::Labor => "Labor",
            QuoteLabel::Material => "Material",
            QuoteLabel::LaborAndMaterial => "Labor and Material",
        }
    }
}

impl fmt::Display for QuoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worker roles used for time-and-materials invoice labor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaborRole {
    Contractor,
    Carpenter,
    Laborer,
    Custom,
}

impl LaborRole {
    pub const ALL: [LaborRole; 4] = [
        LaborRole::Contractor,
        LaborRole::Carpenter,
        LaborRole::Laborer,
        LaborRole::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LaborRole::Contractor => "Contractor",
            LaborRole::Carpenter => "Carpenter",
            LaborRole::Laborer => "Laborer",
            LaborRole::Custom => "Custom",
        }
    }
}

impl fmt::Display for LaborRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worker type written on invoice material lines.
pub const MATERIAL_WORKER_TYPE: &str = "Material";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_derived() {
        let mut line = LineItem::new("Tile", "Material", 10.0, 12.5);
        assert_eq!(line.line_total(), 125.0);
        line.quantity = 4.0;
        assert_eq!(line.line_total(), 50.0);
    }

    #[test]
    fn scope_only_lines_have_no_price() {
        assert!(LineItem::new("Paint walls", "Labor", 0.0, 0.0).is_scope_only());
        assert!(!LineItem::new("Paint walls", "Labor", 1.0, 0.0).is_scope_only());
    }

    #[test]
    fn allowance_total_multiplies_quantity_and_cost() {
        let allowance = AllowanceItem::new("Vanity", 2.0, 450.0);
        assert_eq!(allowance.total(), 900.0);
    }

    #[test]
    fn labels_render_column_text() {
        assert_eq!(QuoteLabel::LaborAndMaterial.to_string(), "Labor and Material");
        assert_eq!(LaborRole::Carpenter.to_string(), "Carpenter");
    }
}
