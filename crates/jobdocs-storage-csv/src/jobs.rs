//! The jobs root: one folder per job, a shared id counter, and the naming
//! rules for the files inside a job folder.

use std::{
    fs,
    path::{Path, PathBuf},
};

use jobdocs_core::CoreError;
use jobdocs_domain::{format_date, leading_job_number, DocType, Document, JobId};
use tracing::{debug, warn};

pub const COUNTER_FILE: &str = "job_counter.txt";
const BACKUP_SUFFIX: &str = "_original";
const FALLBACK_NAME: &str = "Job";

/// Filesystem layout rooted at the jobs folder.
#[derive(Debug, Clone)]
pub struct JobFolders {
    root: PathBuf,
}

impl JobFolders {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn counter_path(&self) -> PathBuf {
        self.root.join(COUNTER_FILE)
    }

    /// Issues the next job id.
    ///
    /// The new number is one past the highest of the existing `J####` folders and
    /// the counter file; it is written back to the counter before returning.
    pub fn next_job_id(&self) -> Result<JobId, CoreError> {
        let mut highest = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(number) = entry.file_name().to_str().and_then(leading_job_number) {
                highest = highest.max(number);
            }
        }

        let counter_path = self.counter_path();
        if let Ok(raw) = fs::read_to_string(&counter_path) {
            match raw.trim().parse::<u32>() {
                Ok(number) => highest = highest.max(number),
                Err(_) => warn!(path = %counter_path.display(), "ignoring unreadable job counter"),
            }
        }

        let next = highest
            .checked_add(1)
            .ok_or_else(|| CoreError::Storage("job numbers are exhausted".into()))?;
        fs::write(&counter_path, next.to_string())?;
        debug!(next, "issued job number");
        Ok(JobId::from_number(next))
    }

    /// Returns (creating it if needed) `<JobID> - <project>` or just `<JobID>`.
    pub fn job_folder(&self, job_id: &JobId, project: Option<&str>) -> Result<PathBuf, CoreError> {
        let name = match project.map(str::trim).filter(|project| !project.is_empty()) {
            Some(project) => format!("{job_id} - {}", sanitize_name(project)),
            None => job_id.to_string(),
        };
        let dir = self.root.join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Folders whose name starts with the job id, sorted.
    pub fn find_job_folders(&self, job_id: &JobId) -> Result<Vec<PathBuf>, CoreError> {
        let mut matches = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(job_id.as_str()))
            {
                matches.push(entry.path());
            }
        }
        matches.sort();
        Ok(matches)
    }
}

/// Keeps letters, digits, space, `_`, `-` and `.`, then turns spaces into underscores.
pub fn sanitize_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.'))
        .collect();
    let safe = kept.trim().replace(' ', "_");
    if safe.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        safe
    }
}

/// `<JobID>_<doctype>_<MM-DD-YYYY>.csv`
pub fn document_csv_name(document: &Document) -> String {
    format!(
        "{}_{}_{}.csv",
        document.job_id,
        document.doc_type.as_str(),
        format_date(document.date)
    )
}

/// `<JobID>_<doctype>_<project>_<MM-DD-YYYY>.html`
pub fn document_html_name(document: &Document) -> String {
    format!(
        "{}_{}_{}_{}.html",
        document.job_id,
        document.doc_type.as_str(),
        sanitize_name(&document.project_name),
        format_date(document.date)
    )
}

/// CSV and HTML paths for a document saved into `dir`.
pub fn document_paths(dir: &Path, document: &Document) -> (PathBuf, PathBuf) {
    (
        dir.join(document_csv_name(document)),
        dir.join(document_html_name(document)),
    )
}

/// Files of a job folder grouped the way they are shown to the operator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderListing {
    pub quotes_csv: Vec<String>,
    pub quotes_html: Vec<String>,
    pub invoices_csv: Vec<String>,
    pub invoices_html: Vec<String>,
    pub receipts: Vec<String>,
    pub others: Vec<String>,
}

impl FolderListing {
    pub fn read(dir: &Path) -> Result<Self, CoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        let mut listing = Self::default();
        for name in names {
            listing.classify(name);
        }
        Ok(listing)
    }

    fn classify(&mut self, name: String) {
        let lower = name.to_lowercase();
        let csv = lower.ends_with(".csv");
        let html = lower.ends_with(".html");
        let quote = lower.contains(&marker(DocType::Quote));
        let invoice = lower.contains(&marker(DocType::Invoice));

        let bucket = match (quote, invoice, csv, html) {
            (true, _, true, _) => &mut self.quotes_csv,
            (true, _, _, true) => &mut self.quotes_html,
            (_, true, true, _) => &mut self.invoices_csv,
            (_, true, _, true) => &mut self.invoices_html,
            _ if csv && lower.contains("receipts") => &mut self.receipts,
            _ => &mut self.others,
        };
        bucket.push(name);
    }

    pub fn quote_count(&self) -> usize {
        self.quotes_csv.len() + self.quotes_html.len()
    }

    pub fn invoice_count(&self) -> usize {
        self.invoices_csv.len() + self.invoices_html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quote_count() + self.invoice_count() + self.receipts.len() + self.others.len() == 0
    }

    /// Non-empty groups with their labels, in display order.
    pub fn groups(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Quotes (CSV)", self.quotes_csv.as_slice()),
            ("Quotes (HTML)", self.quotes_html.as_slice()),
            ("Invoices (CSV)", self.invoices_csv.as_slice()),
            ("Invoices (HTML)", self.invoices_html.as_slice()),
            ("Receipts", self.receipts.as_slice()),
            ("Other files", self.others.as_slice()),
        ]
        .into_iter()
        .filter(|(_, files)| !files.is_empty())
        .collect()
    }
}

fn marker(doc_type: DocType) -> String {
    format!("_{}_", doc_type.as_str())
}

/// Quote CSV files in `dir`, sorted by name.
pub fn quote_files(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    Ok(FolderListing::read(dir)?
        .quotes_csv
        .into_iter()
        .map(|name| dir.join(name))
        .collect())
}

/// What [`backup_originals`] managed to copy.
#[derive(Debug, Default)]
pub struct BackupReport {
    pub created: Vec<PathBuf>,
    pub failures: Vec<String>,
}

/// Copies a quote CSV and its rendered HTML files to `_original` siblings before
/// they are edited. Existing backups are never overwritten.
///
/// HTML files are those named after the CSV stem plus `rendered`, the page the
/// document itself names (its file name carries the project, the CSV name does not).
pub fn backup_originals(csv_path: &Path, rendered: Option<&Path>) -> BackupReport {
    let mut report = BackupReport::default();
    if !csv_path.is_file() {
        return report;
    }
    let (Some(dir), Some(stem)) = (
        csv_path.parent(),
        csv_path.file_stem().and_then(|stem| stem.to_str()),
    ) else {
        return report;
    };

    let mut sources = vec![csv_path.to_path_buf()];
    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.to_lowercase().ends_with(".html")
                    && name.starts_with(stem)
                    && !name.contains(BACKUP_SUFFIX)
                {
                    sources.push(entry.path());
                }
            }
        }
        Err(err) => report
            .failures
            .push(format!("could not list {}: {err}", dir.display())),
    }
    if let Some(page) = rendered.filter(|page| page.is_file()) {
        if !sources.iter().any(|source| source == page) {
            sources.push(page.to_path_buf());
        }
    }
    sources[1..].sort();

    for source in sources {
        let backup = with_suffix(&source, BACKUP_SUFFIX);
        if backup.exists() {
            continue;
        }
        match fs::copy(&source, &backup) {
            Ok(_) => {
                debug!(from = %source.display(), to = %backup.display(), "backed up original");
                report.created.push(backup);
            }
            Err(err) => {
                warn!(path = %source.display(), "backup failed: {err}");
                report
                    .failures
                    .push(format!("could not back up {}: {err}", source.display()));
            }
        }
    }
    report
}

/// Renames `name.ext` to `name<suffix>.ext`; on failure the original path is kept.
pub fn apply_suffix(path: &Path, suffix: &str) -> PathBuf {
    let target = with_suffix(path, suffix);
    match fs::rename(path, &target) {
        Ok(()) => target,
        Err(err) => {
            warn!(path = %path.display(), "could not rename: {err}");
            path.to_path_buf()
        }
    }
}

/// Copies the logo into the job folder unless a file of that name is already there.
pub fn copy_logo(logo: &Path, dir: &Path) -> Result<Option<PathBuf>, CoreError> {
    let Some(name) = logo.file_name() else {
        return Ok(None);
    };
    let target = dir.join(name);
    if target.exists() {
        return Ok(Some(target));
    }
    if !logo.is_file() {
        return Err(CoreError::Storage(format!(
            "logo `{}` not found",
            logo.display()
        )));
    }
    fs::copy(logo, &target)?;
    Ok(Some(target))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_name("  Bathroom Remodel #2 "), "Bathroom_Remodel_2");
        assert_eq!(sanitize_name("Smith/Jones v1.2"), "SmithJones_v1.2");
        assert_eq!(sanitize_name("***"), "Job");
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(
            with_suffix(Path::new("/jobs/J0001_quote_01-02-2025.csv"), "_revised"),
            PathBuf::from("/jobs/J0001_quote_01-02-2025_revised.csv")
        );
    }

    #[test]
    fn listing_classifies_by_name() {
        let mut listing = FolderListing::default();
        for name in [
            "J0001_quote_01-02-2025.csv",
            "J0001_quote_Deck_01-02-2025.html",
            "J0001_invoice_02-02-2025.csv",
            "J0001_receipts.csv",
            "logo.png",
        ] {
            listing.classify(name.to_string());
        }
        assert_eq!(listing.quote_count(), 2);
        assert_eq!(listing.invoices_csv.len(), 1);
        assert_eq!(listing.receipts, vec!["J0001_receipts.csv"]);
        assert_eq!(listing.others, vec!["logo.png"]);
        assert_eq!(listing.groups().len(), 5);
    }
}
