//! jobdocs-core
//!
//! Business logic for quotes, invoices and receipts.
//! Depends on jobdocs-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod builder;
pub mod decode;
pub mod error;
pub mod receipt_service;
pub mod section_service;
pub mod storage;
pub mod time;
pub mod totals_service;


pub use builder::*;
pub use decode::*;
pub use error::CoreError;
pub use receipt_service::*;
pub use section_service::*;
pub use totals_service::*;
