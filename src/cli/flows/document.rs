//! Creating a quote or an invoice from scratch.

use std::{fs, path::PathBuf};

use jobdocs_config::LaborRates;
use jobdocs_core::{DocumentBuilder, DocumentHeader, SectionService};
use jobdocs_domain::{
    AllowanceItem, DocType, JobId, LaborRole, LineItem, PricingMode, QuoteLabel,
};
use tracing::info;

use super::receipts::{choose_receipts_for_invoice, offer_receipt_logging};
use super::{choose_folder, folder_name, print_pdf_hint, save_outputs, show_folder_contents};
use crate::cli::output;
use crate::cli::prompts::{self, Prompter};
use crate::cli::ShellContext;
use crate::currency::{format_money, format_number};
use crate::errors::CliError;

pub fn create_document(context: &mut ShellContext, doc_type: DocType) -> Result<(), CliError> {
    output::header(format!("Create {}", doc_type.title()));
    let prompter = context.prompter.as_mut();
    let existing = prompts::ask_text(
        prompter,
        "Enter existing Job ID (e.g. J0001) or press Enter for new",
    )?;
    let project_name = prompts::ask_text(prompter, "Project name")?;
    let client_name = prompts::ask_text(prompter, "Client name")?;
    let project_address = prompts::ask_text(prompter, "Project address (street, city, etc.)")?;

    let (job_id, dir) = match JobId::parse(&existing) {
        Some(job_id) => {
            let dir = existing_job_folder(context, &job_id, &project_name)?;
            (job_id, dir)
        }
        None => new_job_folder(context, &project_name)?,
    };
    show_folder_contents(&dir)?;

    let rates = context.config.rates;
    let today = context.today();
    let prompter = context.prompter.as_mut();
    let pricing = ask_pricing(prompter, doc_type)?;
    let mut builder = DocumentBuilder::new(doc_type, pricing);
    match (doc_type, pricing) {
        (_, PricingMode::Fixed) => enter_scope_lines(prompter, &mut builder)?,
        (DocType::Quote, PricingMode::Standard) => enter_quote_lines(prompter, &mut builder)?,
        (DocType::Invoice, PricingMode::Standard) => {
            enter_invoice_lines(prompter, &mut builder, &rates)?
        }
    }

    if builder.is_empty() {
        output::info("No line items added. Cancelling.");
        return Ok(());
    }
    reorder_sections(prompter, &mut builder)?;

    let (receipts, receipts_total) = if doc_type == DocType::Invoice {
        offer_receipt_logging(prompter, &dir, &job_id, today)?;
        choose_receipts_for_invoice(prompter, &dir, &job_id)?
    } else {
        (Vec::new(), 0.0)
    };

    let allowances = enter_allowances(prompter)?;
    let fixed_subtotal = match (doc_type, pricing) {
        (_, PricingMode::Standard) => None,
        (DocType::Quote, PricingMode::Fixed) => Some(prompts::ask_amount(
            prompter,
            "Enter fixed grand total for this quote ($)",
        )?),
        (DocType::Invoice, PricingMode::Fixed) => Some(prompts::ask_amount(
            prompter,
            "Enter fixed subtotal for this invoice (before receipts) ($)",
        )?),
    };

    let header = DocumentHeader {
        job_id,
        project_name,
        client_name,
        project_address,
        date: today,
    };
    let document = builder.finish(header, receipts_total, fixed_subtotal, allowances)?;
    let (csv_path, html_path) = save_outputs(context, &document, &dir, &receipts)?;
    info!(job = %document.job_id, "created {}", document.doc_type);

    output::success(format!("Saved {} CSV:   {}", doc_type, csv_path.display()));
    output::success(format!("Saved {} HTML:  {}", doc_type, html_path.display()));
    print_pdf_hint();
    Ok(())
}

fn existing_job_folder(
    context: &mut ShellContext,
    job_id: &JobId,
    project_name: &str,
) -> Result<PathBuf, CliError> {
    let folders = context.jobs.find_job_folders(job_id)?;
    if folders.is_empty() {
        let dir = context.jobs.job_folder(job_id, Some(project_name))?;
        output::section(format!(
            "No existing folder found for {job_id}. Created new folder: {}",
            folder_name(&dir)
        ));
        return Ok(dir);
    }

    let chosen = if folders.len() == 1 {
        folders.into_iter().next()
    } else {
        choose_folder(
            context.prompter.as_mut(),
            &folders,
            Some("Create a new folder for this Job ID"),
        )?
    };
    match chosen {
        Some(dir) => {
            output::section(format!("Using existing job folder: {}", folder_name(&dir)));
            Ok(dir)
        }
        None => {
            let dir = context.jobs.job_folder(job_id, Some(project_name))?;
            output::section(format!("Created new job folder: {}", folder_name(&dir)));
            Ok(dir)
        }
    }
}

/// Issues a fresh id. A folder left over under that name is offered for reuse;
/// declining keeps issuing ids until an empty folder turns up.
fn new_job_folder(
    context: &mut ShellContext,
    project_name: &str,
) -> Result<(JobId, PathBuf), CliError> {
    let mut job_id = context.jobs.next_job_id()?;
    let mut dir = context.jobs.job_folder(&job_id, Some(project_name))?;
    if is_empty_dir(&dir)? {
        output::section(format!(
            "Assigned new Job ID: {job_id} and created folder {}",
            folder_name(&dir)
        ));
        return Ok((job_id, dir));
    }

    output::warning(format!(
        "Job folder {} already existed and is not empty.",
        folder_name(&dir)
    ));
    if context
        .prompter
        .confirm("Use this existing folder for the new document?", true)?
    {
        return Ok((job_id, dir));
    }
    loop {
        job_id = context.jobs.next_job_id()?;
        dir = context.jobs.job_folder(&job_id, Some(project_name))?;
        if is_empty_dir(&dir)? {
            break;
        }
    }
    output::section(format!("Using new empty job folder: {}", folder_name(&dir)));
    Ok((job_id, dir))
}

fn is_empty_dir(dir: &std::path::Path) -> Result<bool, CliError> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

fn ask_pricing(prompter: &mut dyn Prompter, doc_type: DocType) -> Result<PricingMode, CliError> {
    let (prompt, options) = match doc_type {
        DocType::Quote => (
            "Pricing mode for this quote",
            [
                "Standard (line totals roll up to grand total)",
                "Fixed price (manual grand total, blank line pricing)",
            ],
        ),
        DocType::Invoice => (
            "Billing method for this invoice",
            [
                "Time & Materials (labor with rates, materials)",
                "Fixed price (scope-only lines, blank prices)",
            ],
        ),
    };
    Ok(match prompts::choose(prompter, prompt, &options, 0)? {
        0 => PricingMode::Standard,
        _ => PricingMode::Fixed,
    })
}

/// Line menu for priced quotes and invoices.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PricedAction {
    SetSection,
    AddLabor,
    AddMaterial,
    Done,
}

/// Line menu for fixed-price documents.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ScopeAction {
    SetSection,
    AddScope,
    Done,
}

fn ask_line_action<A: Copy>(
    prompter: &mut dyn Prompter,
    entries: &[(A, &str)],
) -> Result<A, CliError> {
    let labels: Vec<&str> = entries.iter().map(|(_, label)| *label).collect();
    let index = prompts::choose(prompter, "Menu", &labels, 0)?;
    Ok(entries[index].0)
}

fn set_section(prompter: &mut dyn Prompter, builder: &mut DocumentBuilder) -> Result<(), CliError> {
    let name = prompts::ask_text(prompter, "Section name (e.g. Interior Painting)")?;
    builder.set_section(&name);
    let shown = match builder.active_section() {
        "" => "(none)",
        other => other,
    };
    output::info(format!("Current section set to: {shown}"));
    Ok(())
}

/// `None` (after telling the operator) when the description is blank.
fn ask_description(prompter: &mut dyn Prompter, prompt: &str) -> Result<Option<String>, CliError> {
    let description = prompts::ask_text(prompter, prompt)?;
    if description.is_empty() {
        output::warning("Description required.");
        return Ok(None);
    }
    Ok(Some(description))
}

fn ask_quote_label(prompter: &mut dyn Prompter) -> Result<QuoteLabel, CliError> {
    let labels: Vec<&str> = QuoteLabel::ALL.iter().map(|label| label.as_str()).collect();
    let index = prompts::choose(
        prompter,
        "How should this line be labeled in the 'Worker / Type' column?",
        &labels,
        0,
    )?;
    Ok(QuoteLabel::ALL[index])
}

fn report_added(kind: &str, line: &LineItem) {
    output::success(format!(
        "Added {kind}: {} | {} | {} @ {} = {}",
        line.description,
        line.worker_type,
        format_number(line.quantity, 2),
        format_money(line.unit_rate),
        format_money(line.line_total())
    ));
}

fn enter_quote_lines(
    prompter: &mut dyn Prompter,
    builder: &mut DocumentBuilder,
) -> Result<(), CliError> {
    output::section("Add Quote Line Items (Standard Pricing).");
    output::info("You can create section headings (e.g. 'Interior Paint', 'Framing & Demo').");
    let entries = [
        (PricedAction::SetSection, "Set / Change Section Heading"),
        (PricedAction::AddLabor, "Add Labor Line (fixed amount)"),
        (PricedAction::AddMaterial, "Add Material Line"),
        (PricedAction::Done, "Done adding quote items"),
    ];

    loop {
        match ask_line_action(prompter, &entries)? {
            PricedAction::SetSection => set_section(prompter, builder)?,
            PricedAction::AddLabor => {
                let Some(description) = ask_description(prompter, "Scope item / short label")?
                else {
                    continue;
                };
                let detail = prompts::ask_text(
                    prompter,
                    "Detailed description for quote (shows under the line item)",
                )?;
                let amount = prompts::ask_amount(prompter, "Total labor amount for this item")?;
                let label = ask_quote_label(prompter)?;
                match builder.add_lump_sum_labor(&description, &detail, amount, label) {
                    Ok(line) => output::success(format!(
                        "Added labor line: {} | Label = {} | Amount = {}",
                        line.description,
                        line.worker_type,
                        format_money(line.line_total())
                    )),
                    Err(err) => output::warning(err),
                }
            }
            PricedAction::AddMaterial => {
                let Some(description) = ask_description(
                    prompter,
                    "Scope item / short label (e.g. tile, lumber, fixtures)",
                )?
                else {
                    continue;
                };
                let detail = prompts::ask_text(
                    prompter,
                    "Detailed description for this material line (optional)",
                )?;
                let quantity = prompts::ask_amount(prompter, "Quantity")?;
                let price = prompts::ask_amount(prompter, "Unit price ($)")?;
                let label = ask_quote_label(prompter)?;
                match builder.add_material(&description, &detail, quantity, price, Some(label.as_str()))
                {
                    Ok(line) => report_added("material line", line),
                    Err(err) => output::warning(err),
                }
            }
            PricedAction::Done => return Ok(()),
        }
    }
}

fn enter_invoice_lines(
    prompter: &mut dyn Prompter,
    builder: &mut DocumentBuilder,
    rates: &LaborRates,
) -> Result<(), CliError> {
    output::section("Add Invoice Line Items (Time & Materials).");
    output::info("You can create section headings (e.g. 'Interior Painting', 'Framing & Demo').");
    let entries = [
        (PricedAction::SetSection, "Set / Change Section Heading"),
        (PricedAction::AddLabor, "Add Labor Line (with rate)"),
        (PricedAction::AddMaterial, "Add Material Line"),
        (PricedAction::Done, "Done adding invoice items"),
    ];

    loop {
        match ask_line_action(prompter, &entries)? {
            PricedAction::SetSection => set_section(prompter, builder)?,
            PricedAction::AddLabor => {
                let Some(description) =
                    ask_description(prompter, "Scope / description (e.g. Demo, Framing)")?
                else {
                    continue;
                };
                let role = ask_labor_role(prompter, rates)?;
                let rate = ask_rate(prompter, role, rates)?;
                let hours = prompts::ask_amount(prompter, "Hours for this line item")?;
                match builder.add_hourly_labor(&description, role.as_str(), hours, rate) {
                    Ok(line) => report_added("labor", line),
                    Err(err) => output::warning(err),
                }
            }
            PricedAction::AddMaterial => {
                let Some(description) = ask_description(
                    prompter,
                    "Scope / description (e.g. lumber, drywall, tile)",
                )?
                else {
                    continue;
                };
                let quantity = prompts::ask_amount(prompter, "Quantity")?;
                let price = prompts::ask_amount(prompter, "Unit price ($)")?;
                match builder.add_material(&description, "", quantity, price, None) {
                    Ok(line) => report_added("material", line),
                    Err(err) => output::warning(err),
                }
            }
            PricedAction::Done => return Ok(()),
        }
    }
}

fn enter_scope_lines(
    prompter: &mut dyn Prompter,
    builder: &mut DocumentBuilder,
) -> Result<(), CliError> {
    let doc_type = builder.doc_type();
    output::section(format!(
        "Adding scope-only line items for fixed-price {doc_type}."
    ));
    output::info("These lines will show scope only, with blank pricing columns.");
    let entries = [
        (ScopeAction::SetSection, "Set / Change Section Heading"),
        (ScopeAction::AddScope, "Add Scope Line"),
        (ScopeAction::Done, "Done adding scope items"),
    ];

    loop {
        match ask_line_action(prompter, &entries)? {
            ScopeAction::SetSection => set_section(prompter, builder)?,
            ScopeAction::AddScope => {
                let description = prompts::ask_text(
                    prompter,
                    "Scope item / short label (or ENTER to finish)",
                )?;
                if description.is_empty() {
                    continue;
                }
                let label = ask_quote_label(prompter)?;
                let detail = if doc_type == DocType::Quote {
                    prompts::ask_text(prompter, "Detailed description for quote (optional)")?
                } else {
                    String::new()
                };
                match builder.add_scope_line(&description, label, &detail) {
                    Ok(line) => output::success(format!(
                        "Added scope-only line: {} ({})",
                        line.description, line.worker_type
                    )),
                    Err(err) => output::warning(err),
                }
            }
            ScopeAction::Done => return Ok(()),
        }
    }
}

fn ask_labor_role(prompter: &mut dyn Prompter, rates: &LaborRates) -> Result<LaborRole, CliError> {
    let labels: Vec<String> = LaborRole::ALL
        .iter()
        .map(|role| match rates.rate_for(*role) {
            Some(rate) => format!("{role} ({}/hr default)", format_money(rate)),
            None => role.to_string(),
        })
        .collect();
    let index = prompts::choose(prompter, "Select worker type", &labels, 0)?;
    Ok(LaborRole::ALL[index])
}

fn ask_rate(
    prompter: &mut dyn Prompter,
    role: LaborRole,
    rates: &LaborRates,
) -> Result<f64, CliError> {
    if let Some(rate) = rates.rate_for(role) {
        let prompt = format!("Use default rate for {role} ({}/hr)?", format_money(rate));
        if prompter.confirm(&prompt, true)? {
            return Ok(rate);
        }
    }
    prompts::ask_amount(prompter, "Enter custom hourly rate ($)")
}

fn show_sections_overview(builder: &DocumentBuilder) {
    output::section("Current section overview (in order):");
    for (index, group) in SectionService::groups(builder.lines()).iter().enumerate() {
        output::detail(format!("{}. {}", index + 1, group.label()));
        for line in &group.lines {
            output::detail(format!("   - {} ({})", line.description, line.worker_type));
        }
    }
}

/// Offered only when there is more than one section.
fn reorder_sections(
    prompter: &mut dyn Prompter,
    builder: &mut DocumentBuilder,
) -> Result<(), CliError> {
    let count = builder.section_order().len();
    if count <= 1 {
        return Ok(());
    }
    show_sections_overview(builder);
    if !prompter.confirm("Would you like to reorder these sections?", false)? {
        return Ok(());
    }

    output::info("Enter a new order for sections using their numbers.");
    output::info("Example: with 1. Interior, 2. Exterior, 3. Framing, entering 3,1,2 puts Framing first.");
    loop {
        let raw = prompts::ask_text(prompter, "New section order (comma-separated)")?;
        let reordered = SectionService::parse_order(&raw, count)
            .and_then(|order| builder.reorder_sections(&order));
        match reordered {
            Ok(()) => break,
            Err(err) => output::warning(err),
        }
    }
    output::section("Sections have been reordered.");
    show_sections_overview(builder);
    Ok(())
}

fn enter_allowances(prompter: &mut dyn Prompter) -> Result<Vec<AllowanceItem>, CliError> {
    output::section("Owner Allowances (items client will purchase directly).");
    output::info("Press ENTER on description to finish.");
    let mut allowances = Vec::new();
    loop {
        let description =
            prompts::ask_text(prompter, "Allowance description (or ENTER to finish)")?;
        if description.is_empty() {
            return Ok(allowances);
        }
        let quantity = prompts::ask_amount(prompter, "Quantity")?;
        let unit_cost = prompts::ask_amount(prompter, "Estimated unit cost ($)")?;
        let allowance = AllowanceItem::new(description, quantity, unit_cost);
        output::success(format!(
            "Added allowance: {} | {} @ {} = {}",
            allowance.description,
            format_number(allowance.quantity, 2),
            format_money(allowance.unit_cost),
            format_money(allowance.total())
        ));
        allowances.push(allowance);
    }
}
