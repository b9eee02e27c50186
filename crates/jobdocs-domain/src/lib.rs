//! jobdocs-domain
//!
//! Pure domain models (Document, LineItem, AllowanceItem, Receipt, JobId, etc.).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod document;
pub mod job;
pub mod line_item;
pub mod receipt;

pub use common::*;
pub use document::*;
pub use job::*;
pub use line_item::*;
pub use receipt::*;
