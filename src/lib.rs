//! jobdocs builds contractor quotes and invoices as paired CSV and HTML files,
//! one folder per job, and keeps a ledger of expense receipts for each job.

pub mod cli;
pub mod currency;
pub mod errors;
pub mod render;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("jobdocs tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
