use jobdocs_domain::LaborRole;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const JOBS_FOLDER_NAME: &str = "ContractorJobs";

/// Everything the operator can tailor without touching code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub company: CompanyProfile,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Root folder holding one subfolder per job. Defaults to `~/Desktop/ContractorJobs`.
    pub jobs_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Image copied into each job folder and shown in the document header.
    pub logo_path: Option<PathBuf>,

    #[serde(default)]
    pub rates: LaborRates,

    #[serde(default = "Config::default_notes")]
    pub notes: Vec<String>,

    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company: CompanyProfile::default(),
            jobs_root: None,
            logo_path: None,
            rates: LaborRates::default(),
            notes: Self::default_notes(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_notes() -> Vec<String> {
        vec![
            "Proposal/Invoice is valid for 30 days unless otherwise noted.".into(),
            "Any additional work or materials not included will be charged via additional quote/invoice.".into(),
            "All work to be performed in a workmanlike manner according to standard practices.".into(),
        ]
    }

    pub fn resolve_jobs_root(&self) -> PathBuf {
        if let Some(path) = &self.jobs_root {
            return path.clone();
        }

        let base = dirs::desktop_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(JOBS_FOLDER_NAME)
    }

    /// The logo, if one is configured and present on disk.
    pub fn existing_logo(&self) -> Option<&PathBuf> {
        self.logo_path.as_ref().filter(|path| path.is_file())
    }
}

/// Contractor details printed in every document header and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub city_line: String,
    pub phone: String,
    pub email: String,
    pub license: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Your Company Name".into(),
            city_line: "City, ST 00000".into(),
            phone: "(000) 000-0000".into(),
            email: "office@example.com".into(),
            license: "License #".into(),
        }
    }
}

/// Default hourly rates offered when billing labor by role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborRates {
    pub contractor: f64,
    pub carpenter: f64,
    pub laborer: f64,
}

impl Default for LaborRates {
    fn default() -> Self {
        Self {
            contractor: 80.0,
            carpenter: 70.0,
            laborer: 55.0,
        }
    }
}

impl LaborRates {
    /// `None` for custom roles, which always ask for a rate.
    pub fn rate_for(&self, role: LaborRole) -> Option<f64> {
        match role {
            LaborRole::Contractor => Some(self.contractor),
            LaborRole::Carpenter => Some(self.carpenter),
            LaborRole::Laborer => Some(self.laborer),
            LaborRole::Custom => None,
        }
    }
}
