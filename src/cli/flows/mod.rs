//! Menu flows. Each runs to completion or hands an error back to the menu.

mod document;
mod edit;
mod receipts;

use std::path::{Path, PathBuf};

use jobdocs_core::{storage::DocumentStorage, ParseWarning};
use jobdocs_domain::{Document, JobId, Receipt};
use jobdocs_storage_csv::{copy_logo, document_paths, write_atomic, FolderListing};
use tracing::warn;

use crate::cli::output;
use crate::cli::prompts::{self, Prompter};
use crate::cli::ShellContext;
use crate::errors::CliError;
use crate::render::{render_document, RenderContext};

pub use document::create_document;
pub use edit::edit_quote;
pub use receipts::log_receipts;

pub(crate) fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

pub(crate) fn show_folder_contents(dir: &Path) -> Result<(), CliError> {
    output::section(format!("Existing files in job folder: {}", folder_name(dir)));
    let listing = FolderListing::read(dir)?;
    if listing.is_empty() {
        output::detail("(No files in this job folder yet.)");
        return Ok(());
    }

    output::detail(format!(
        "Summary: {} quote file(s), {} invoice file(s), {} receipts file(s), {} other file(s).",
        listing.quote_count(),
        listing.invoice_count(),
        listing.receipts.len(),
        listing.others.len()
    ));
    for (label, files) in listing.groups() {
        output::detail(format!("{label}:"));
        for file in files {
            output::detail(format!("  - {file}"));
        }
    }
    Ok(())
}

/// Lets the operator pick one of several folders for the same job id.
/// `extra` adds a trailing option; choosing it returns `None`.
pub(crate) fn choose_folder(
    prompter: &mut dyn Prompter,
    folders: &[PathBuf],
    extra: Option<&str>,
) -> Result<Option<PathBuf>, CliError> {
    output::section("Multiple folders found for this Job ID:");
    let mut labels: Vec<String> = folders.iter().map(|dir| folder_name(dir)).collect();
    if let Some(extra) = extra {
        labels.push(extra.to_string());
    }
    let index = prompts::choose(prompter, "Select folder", &labels, 0)?;
    Ok(folders.get(index).cloned())
}

/// Existing folders for `job_id`: the only one, the operator's pick, or `None`.
pub(crate) fn pick_existing_folder(
    context: &mut ShellContext,
    job_id: &JobId,
) -> Result<Option<PathBuf>, CliError> {
    let folders = context.jobs.find_job_folders(job_id)?;
    match folders.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.clone())),
        _ => choose_folder(context.prompter.as_mut(), &folders, None),
    }
}

/// Writes the CSV and its HTML page into `dir`. Returns both paths.
pub(crate) fn save_outputs(
    context: &ShellContext,
    document: &Document,
    dir: &Path,
    receipts: &[Receipt],
) -> Result<(PathBuf, PathBuf), CliError> {
    let (csv_path, html_path) = document_paths(dir, document);

    let mut logo_src = None;
    if let Some(logo) = context.config.existing_logo() {
        match copy_logo(logo, dir) {
            Ok(copied) => logo_src = copied.as_deref().map(folder_name),
            Err(err) => {
                warn!(logo = %logo.display(), "logo copy failed: {err}");
                output::warning(format!("Could not copy logo to job folder: {err}"));
            }
        }
    }

    let html = render_document(
        document,
        &RenderContext {
            company: &context.config.company,
            notes: &context.config.notes,
            logo_src: logo_src.as_deref(),
            receipts,
        },
    )?;
    context.storage.save_document(document, &csv_path)?;
    write_atomic(&html_path, &html)?;
    Ok((csv_path, html_path))
}

pub(crate) fn report_warnings(warnings: &[ParseWarning]) {
    for warning in warnings {
        output::warning(warning);
    }
}

pub(crate) fn print_pdf_hint() {
    output::info("Open the HTML file in your browser and use 'Print > Save as PDF' for client copies.");
}
