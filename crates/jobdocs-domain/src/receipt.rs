//! Expense receipts logged against a job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{parse_date, Amounted, Displayable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub job_id: String,
    pub item: String,
    /// Raw `MM-DD-YYYY` text; kept verbatim so hand-edited rows are rewritten unchanged.
    pub date: String,
    pub cost: f64,
}

impl Receipt {
    pub fn new(
        job_id: impl Into<String>,
        item: impl Into<String>,
        date: impl Into<String>,
        cost: f64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            item: item.into(),
            date: date.into(),
            cost,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

impl Amounted for Receipt {
    fn amount(&self) -> f64 {
        self.cost
    }
}

impl Displayable for Receipt {
    fn display_label(&self) -> String {
        format!(
            "[{}] {} - ${:.2} (Job {})",
            self.date, self.item, self.cost, self.job_id
        )
    }
}
