//! jobdocs-config
//!
//! Operator configuration: company profile, jobs root, logo, default labor
//! rates and document notes, persisted as JSON.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{CompanyProfile, Config, LaborRates};
