use chrono::NaiveDate;
use jobdocs_domain::{
    AllowanceItem, DocType, Document, JobId, LineItem, PricingMode, QuoteLabel,
    MATERIAL_WORKER_TYPE,
};

use crate::{totals_service::validate_amount, CoreError, SectionService, TotalsService};

/// Metadata collected before line entry starts.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    pub job_id: JobId,
    pub project_name: String,
    pub client_name: String,
    pub project_address: String,
    pub date: NaiveDate,
}

/// Accumulates line items during interactive entry.
///
/// The active section is builder state: every line added picks up whatever
/// heading was set last.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    doc_type: DocType,
    pricing: PricingMode,
    active_section: String,
    lines: Vec<LineItem>,
}

impl DocumentBuilder {
    pub fn new(doc_type: DocType, pricing: PricingMode) -> Self {
        Self {
            doc_type,
            pricing,
            active_section: String::new(),
            lines: Vec::new(),
        }
    }

    pub fn doc_type(&self) -> DocType {
        self.doc_type
    }

    pub fn pricing(&self) -> PricingMode {
        self.pricing
    }

    pub fn set_section(&mut self, name: &str) {
        self.active_section = name.trim().to_string();
    }

    pub fn active_section(&self) -> &str {
        &self.active_section
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quote labor priced as one amount: recorded as 1 × amount.
    pub fn add_lump_sum_labor(
        &mut self,
        description: &str,
        detail: &str,
        amount: f64,
        label: QuoteLabel,
    ) -> Result<&LineItem, CoreError> {
        self.require_priced()?;
        validate_amount("labor amount", amount)?;
        self.push(description, detail, label.as_str(), 1.0, amount)
    }

    /// Invoice labor billed by the hour.
    pub fn add_hourly_labor(
        &mut self,
        description: &str,
        worker_type: &str,
        hours: f64,
        rate: f64,
    ) -> Result<&LineItem, CoreError> {
        self.require_priced()?;
        validate_amount("hours", hours)?;
        validate_amount("rate", rate)?;
        self.push(description, "", worker_type, hours, rate)
    }

    pub fn add_material(
        &mut self,
        description: &str,
        detail: &str,
        quantity: f64,
        unit_price: f64,
        worker_type: Option<&str>,
    ) -> Result<&LineItem, CoreError> {
        self.require_priced()?;
        validate_amount("quantity", quantity)?;
        validate_amount("unit price", unit_price)?;
        let worker_type = worker_type.unwrap_or(MATERIAL_WORKER_TYPE);
        self.push(description, detail, worker_type, quantity, unit_price)
    }

    /// Fixed-price scope line with blank pricing columns.
    pub fn add_scope_line(
        &mut self,
        description: &str,
        label: QuoteLabel,
        detail: &str,
    ) -> Result<&LineItem, CoreError> {
        if self.pricing != PricingMode::Fixed {
            return Err(CoreError::InvalidOperation(
                "scope-only lines belong to fixed-price documents".into(),
            ));
        }
        self.push(description, detail, label.as_str(), 0.0, 0.0)
    }

    pub fn section_order(&self) -> Vec<String> {
        SectionService::section_order(&self.lines)
    }

    /// Moves whole sections; `order` holds zero-based section positions.
    pub fn reorder_sections(&mut self, order: &[usize]) -> Result<(), CoreError> {
        let lines = std::mem::take(&mut self.lines);
        match SectionService::reorder(lines.clone(), order) {
            Ok(reordered) => {
                self.lines = reordered;
                Ok(())
            }
            Err(err) => {
                self.lines = lines;
                Err(err)
            }
        }
    }

    /// Produces the finished document. Fixed pricing needs `fixed_subtotal`.
    pub fn finish(
        self,
        header: DocumentHeader,
        receipts_total: f64,
        fixed_subtotal: Option<f64>,
        allowances: Vec<AllowanceItem>,
    ) -> Result<Document, CoreError> {
        if self.lines.is_empty() {
            return Err(CoreError::NoLineItems);
        }
        validate_amount("receipts total", receipts_total)?;
        let totals =
            TotalsService::for_pricing(self.pricing, &self.lines, receipts_total, fixed_subtotal)?;

        let mut document = Document::new(self.doc_type, header.job_id, header.date);
        document.project_name = header.project_name;
        document.client_name = header.client_name;
        document.project_address = header.project_address;
        document.pricing = self.pricing;
        document.lines = self.lines;
        document.totals = totals;
        document.allowances = allowances;
        Ok(document)
    }

    fn require_priced(&self) -> Result<(), CoreError> {
        if self.pricing == PricingMode::Fixed {
            return Err(CoreError::InvalidOperation(
                "fixed-price documents only take scope lines".into(),
            ));
        }
        Ok(())
    }

    fn push(
        &mut self,
        description: &str,
        detail: &str,
        worker_type: &str,
        quantity: f64,
        unit_rate: f64,
    ) -> Result<&LineItem, CoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::Validation("description required".into()));
        }
        let line = LineItem::new(description, worker_type, quantity, unit_rate)
            .with_section(self.active_section.clone())
            .with_detail(detail.trim());
        self.lines.push(line);
        Ok(&self.lines[self.lines.len() - 1])
    }
}
