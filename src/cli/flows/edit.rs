use std::path::{Path, PathBuf};

use jobdocs_core::{
    storage::{document_warnings, DocumentStorage},
    DecodeMode, TotalsService,
};
use jobdocs_domain::{format_date, Document, JobId};
use jobdocs_storage_csv::{apply_suffix, backup_originals, document_paths, quote_files};
use tracing::info;

use super::{choose_folder, folder_name, print_pdf_hint, report_warnings, save_outputs};
use crate::cli::output;
use crate::cli::prompts::{self, Prompter};
use crate::cli::ShellContext;
use crate::currency::format_money;
use crate::errors::CliError;

const NAMING_OPTIONS: [&str; 3] = [
    "Mark as REVISED (adds _revised before extension)",
    "Mark as NEW (adds _new before extension)",
    "Keep default names",
];

pub fn edit_quote(context: &mut ShellContext) -> Result<(), CliError> {
    output::header("Edit Existing Quote");
    let raw = prompts::ask_text(
        context.prompter.as_mut(),
        "Enter Job ID for the quote (e.g. J0001)",
    )?;
    let Some(job_id) = JobId::parse(&raw) else {
        output::warning("Job ID is required.");
        return Ok(());
    };

    let Some(dir) = job_folder(context, &job_id)? else {
        output::warning(format!("No job folder found for {job_id}."));
        return Ok(());
    };
    let Some(csv_path) = choose_quote(context.prompter.as_mut(), &dir)? else {
        return Ok(());
    };

    output::section(format!("Loading quote: {}", folder_name(&csv_path)));
    let decoded = context
        .storage
        .load_document(&csv_path, DecodeMode::Lenient)?;
    report_warnings(&decoded.warnings);
    let mut document = decoded.document;
    if document.job_id.is_empty() {
        output::warning(format!("Quote file has no Job ID; using {job_id}."));
        document.job_id = job_id.clone();
    }

    let (_, rendered) = document_paths(&dir, &document);
    let backup = backup_originals(&csv_path, Some(&rendered));
    for created in &backup.created {
        output::info(format!("Backup created: {}", folder_name(created)));
    }
    for failure in &backup.failures {
        output::warning(failure);
    }
    for warning in document_warnings(&document) {
        output::warning(warning);
    }

    show_header_values(&document);
    let prompter = context.prompter.as_mut();
    if !prompter.confirm("Edit these values?", true)? {
        output::info("No changes made.");
        return Ok(());
    }
    edit_header_fields(prompter, &mut document)?;

    let (csv_saved, html_saved) = save_outputs(context, &document, &dir, &[])?;
    info!(job = %document.job_id, path = %csv_saved.display(), "quote updated");

    output::section("How would you like to name the updated files?");
    let choice = prompts::choose(context.prompter.as_mut(), "Choice", &NAMING_OPTIONS, 2)?;
    let (csv_saved, html_saved) = match choice {
        0 => rename_pair(&csv_saved, &html_saved, "_revised"),
        1 => rename_pair(&csv_saved, &html_saved, "_new"),
        _ => (csv_saved, html_saved),
    };

    output::success(format!("Saved updated quote CSV:  {}", csv_saved.display()));
    output::success(format!("Saved updated quote HTML: {}", html_saved.display()));
    print_pdf_hint();
    Ok(())
}

fn job_folder(context: &mut ShellContext, job_id: &JobId) -> Result<Option<PathBuf>, CliError> {
    let folders = context.jobs.find_job_folders(job_id)?;
    match folders.as_slice() {
        [] => Ok(None),
        [only] => {
            output::section(format!("Using job folder: {}", folder_name(only)));
            Ok(Some(only.clone()))
        }
        _ => choose_folder(context.prompter.as_mut(), &folders, None),
    }
}

fn choose_quote(prompter: &mut dyn Prompter, dir: &Path) -> Result<Option<PathBuf>, CliError> {
    let files = quote_files(dir)?;
    if files.is_empty() {
        output::warning("No quote CSV files found in this job folder.");
        return Ok(None);
    }
    output::section("Quote files:");
    let labels: Vec<String> = files.iter().map(|path| folder_name(path)).collect();
    let index = prompts::choose(prompter, "Select quote to edit", &labels, 0)?;
    Ok(files.get(index).cloned())
}

fn show_header_values(document: &Document) {
    output::section("Current header values:");
    output::detail(format!("Project:  {}", document.project_name));
    output::detail(format!("Client:   {}", document.client_name));
    output::detail(format!("Address:  {}", document.project_address));
    output::detail(format!("Date:     {}", format_date(document.date)));
    output::detail(format!("Subtotal: {}", format_money(document.totals.subtotal)));
    output::detail(format!("Receipts: {}", format_money(document.totals.receipts_total)));
    output::detail(format!("Grand:    {}", format_money(document.totals.grand_total)));
}

/// ENTER keeps every field. A changed subtotal becomes a manual value; a blank
/// grand total is derived again from subtotal and receipts.
fn edit_header_fields(prompter: &mut dyn Prompter, document: &mut Document) -> Result<(), CliError> {
    output::section("Edit Quote Header Fields");
    document.project_name =
        prompts::ask_text_or(prompter, "New project name", &document.project_name)?;
    document.client_name =
        prompts::ask_text_or(prompter, "New client name", &document.client_name)?;
    document.project_address =
        prompts::ask_text_or(prompter, "New address", &document.project_address)?;
    document.date = prompts::ask_date_or(prompter, "New date", document.date)?;

    let totals = &mut document.totals;
    let receipts = prompts::ask_amount_or(prompter, "New receipts total", totals.receipts_total)?;
    TotalsService::set_receipts_total(totals, receipts);

    let subtotal = prompts::ask_amount_or(prompter, "New subtotal", totals.subtotal)?;
    if subtotal != totals.subtotal {
        TotalsService::override_subtotal(totals, subtotal);
    }

    output::info(format!(
        "Current grand total: {}",
        format_money(totals.grand_total)
    ));
    output::info("Press ENTER to auto-calc (subtotal + receipts).");
    match prompts::ask_optional_amount(prompter, "New grand total (ENTER for auto)")? {
        Some(grand_total) => TotalsService::override_grand_total(totals, grand_total),
        None => TotalsService::auto_grand_total(totals),
    }
    Ok(())
}

fn rename_pair(csv: &Path, html: &Path, suffix: &str) -> (PathBuf, PathBuf) {
    (apply_suffix(csv, suffix), apply_suffix(html, suffix))
}
