use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use jobdocs_core::{ReceiptSelection, ReceiptService};
use jobdocs_domain::{format_date, parse_date, Displayable, JobId, Receipt};
use jobdocs_storage_csv::{new_receipts_path, receipt_files, ReceiptLedger};
use tracing::warn;

use super::{folder_name, pick_existing_folder, report_warnings};
use crate::cli::output;
use crate::cli::prompts::{self, Prompter};
use crate::cli::ShellContext;
use crate::currency::format_money;
use crate::errors::CliError;

/// Main-menu receipt logging: entries are taken until a blank item.
pub fn log_receipts(context: &mut ShellContext) -> Result<(), CliError> {
    output::header("Log Receipt");
    let raw = prompts::ask_text(context.prompter.as_mut(), "Enter Job ID (e.g. J0001)")?;
    let Some(job_id) = JobId::parse(&raw) else {
        output::warning("Job ID is required to log receipts.");
        return Ok(());
    };

    let dir = match pick_existing_folder(context, &job_id)? {
        Some(dir) => dir,
        None => context.jobs.job_folder(&job_id, None)?,
    };
    let today = context.today();
    let prompter = context.prompter.as_mut();
    let ledger = ReceiptLedger::new(choose_file_for_logging(prompter, &dir, &job_id)?);
    output::section(format!("Logging receipts to: {}", ledger.path().display()));
    output::info("Press ENTER on Item description when you are finished.");

    loop {
        let item = prompts::ask_text(
            prompter,
            "Item / vendor / brief description (or ENTER to finish)",
        )?;
        if item.is_empty() {
            break;
        }
        record_receipt(prompter, &ledger, &job_id, item, today)?;
    }

    reorganize(&ledger);
    output::info("Done logging receipts for this job.");
    Ok(())
}

/// Optional receipt entry offered while building an invoice, before receipts are
/// chosen, so the new entries can be billed right away.
pub(crate) fn offer_receipt_logging(
    prompter: &mut dyn Prompter,
    dir: &Path,
    job_id: &JobId,
    today: NaiveDate,
) -> Result<(), CliError> {
    output::header("Receipts (Optional)");
    if !prompter.confirm("Do you want to enter receipts now?", false)? {
        return Ok(());
    }

    let ledger = ReceiptLedger::new(choose_file_for_logging(prompter, dir, job_id)?);
    output::section(format!("Logging receipts to: {}", ledger.path().display()));

    while prompter.confirm("Add a receipt?", true)? {
        let item = prompts::ask_text(prompter, "Item / vendor / brief description")?;
        if item.is_empty() {
            output::warning("Description cannot be blank.");
            continue;
        }
        record_receipt(prompter, &ledger, job_id, item, today)?;
    }

    reorganize(&ledger);
    Ok(())
}

/// Receipts to bill on an invoice and their total. Empty with a zero total when
/// the operator declines, cancels, or the selection adds up to nothing.
pub(crate) fn choose_receipts_for_invoice(
    prompter: &mut dyn Prompter,
    dir: &Path,
    job_id: &JobId,
) -> Result<(Vec<Receipt>, f64), CliError> {
    const NONE: (Vec<Receipt>, f64) = (Vec::new(), 0.0);

    if !prompter.confirm("Include receipts from CSV in this invoice?", false)? {
        return Ok(NONE);
    }
    let Some(path) = choose_file_for_invoice(prompter, dir, job_id)? else {
        return Ok(NONE);
    };

    output::info(format!("Reading receipts from: {}", path.display()));
    let loaded = ReceiptLedger::new(&path).load()?;
    report_warnings(&loaded.warnings);
    if loaded.receipts.is_empty() {
        output::warning("No receipt data found in that file. Continuing without receipts.");
        return Ok(NONE);
    }

    let selection = ask_selection(prompter, &loaded.receipts)?;
    let selected = ReceiptService::select(&loaded.receipts, &selection)?;
    if selected.is_empty() {
        output::warning("No receipts selected. Continuing without receipts.");
        return Ok(NONE);
    }
    let total = ReceiptService::total(&selected);
    if total <= 0.0 {
        output::warning("Selected receipts total is 0. Continuing without receipts.");
        return Ok(NONE);
    }

    output::info(format!(
        "Receipts total to include in invoice: {}",
        format_money(total)
    ));
    output::info("This amount will be added to the grand total and shown in a receipts section.");
    Ok((selected, total))
}

fn ask_selection(
    prompter: &mut dyn Prompter,
    receipts: &[Receipt],
) -> Result<ReceiptSelection, CliError> {
    let modes = [
        "All receipts in file",
        "Filter by date range (MM-DD-YYYY)",
        "Select specific line numbers",
    ];
    match prompts::choose(prompter, "How would you like to include receipts?", &modes, 0)? {
        0 => Ok(ReceiptSelection::All),
        1 => loop {
            let start = prompts::ask_date(prompter, "Start date")?;
            let end = prompts::ask_date(prompter, "End date")?;
            if end < start {
                output::warning("End date is before start date. Please try again.");
                continue;
            }
            break Ok(ReceiptSelection::DateRange { start, end });
        },
        _ => {
            output::section("Current receipts in file:");
            for (index, receipt) in receipts.iter().enumerate() {
                output::detail(format!("{}. {}", index + 1, receipt.display_label()));
            }
            output::info("Enter line numbers to include (e.g. 1,3,5-7).");
            let raw = prompts::ask_text(prompter, "Selection")?;
            Ok(ReceiptSelection::Lines(
                ReceiptService::parse_line_selection(&raw, receipts.len()),
            ))
        }
    }
}

fn choose_file_for_logging(
    prompter: &mut dyn Prompter,
    dir: &Path,
    job_id: &JobId,
) -> Result<PathBuf, CliError> {
    let existing = receipt_files(dir, job_id)?;
    if existing.is_empty() {
        let path = new_receipts_path(dir, job_id);
        output::section(format!("No receipts files found for {job_id}."));
        output::info(format!("Creating new receipts file: {}", folder_name(&path)));
        return Ok(path);
    }

    output::section(format!("Existing receipts files for {job_id}:"));
    let mut labels: Vec<String> = existing.iter().map(|path| folder_name(path)).collect();
    labels.push("Create a NEW receipts file".to_string());
    let index = prompts::choose(prompter, "Select receipts file", &labels, 0)?;
    match existing.get(index) {
        Some(path) => {
            output::info(format!("Using existing receipts file: {}", folder_name(path)));
            Ok(path.clone())
        }
        None => {
            let path = new_receipts_path(dir, job_id);
            output::info(format!("Creating new receipts file: {}", folder_name(&path)));
            Ok(path)
        }
    }
}

fn choose_file_for_invoice(
    prompter: &mut dyn Prompter,
    dir: &Path,
    job_id: &JobId,
) -> Result<Option<PathBuf>, CliError> {
    let existing = receipt_files(dir, job_id)?;
    let path = match existing.as_slice() {
        [] => {
            output::section(format!("No receipts files found for {job_id}."));
            return Ok(None);
        }
        [only] => only.clone(),
        _ => {
            output::section(format!("Multiple receipts files found for {job_id}:"));
            let mut labels: Vec<String> =
                existing.iter().map(|path| folder_name(path)).collect();
            labels.push("Cancel (do not include receipts)".to_string());
            let index = prompts::choose(prompter, "Select receipts file", &labels, 0)?;
            match existing.get(index) {
                Some(path) => path.clone(),
                None => {
                    output::info("Skipping receipts for this invoice.");
                    return Ok(None);
                }
            }
        }
    };
    output::section(format!("Using receipts file: {}", folder_name(&path)));
    Ok(Some(path))
}

/// Asks for date and cost, then appends the row.
fn record_receipt(
    prompter: &mut dyn Prompter,
    ledger: &ReceiptLedger,
    job_id: &JobId,
    item: String,
    today: NaiveDate,
) -> Result<(), CliError> {
    let raw_date = prompts::ask_text(prompter, "Receipt date (MM-DD-YYYY, blank for today)")?;
    let date = if raw_date.is_empty() {
        format_date(today)
    } else if parse_date(&raw_date).is_some() {
        raw_date
    } else {
        output::warning("Invalid date format. Using today instead.");
        format_date(today)
    };
    let cost = prompts::ask_amount(prompter, "Receipt cost ($)")?;

    ledger.append(&Receipt::new(job_id.as_str(), item, date, cost))?;
    output::success(format!("Receipt logged to {}", ledger.path().display()));
    Ok(())
}

/// Sorting is best effort; a failure leaves the appended rows in entry order.
fn reorganize(ledger: &ReceiptLedger) {
    match ledger.reorganize() {
        Ok(_) => output::info("Receipts file reorganized by date and item."),
        Err(err) => {
            warn!(path = %ledger.path().display(), "reorganize failed: {err}");
            output::warning(format!("Could not reorganize receipts file: {err}"));
        }
    }
}
