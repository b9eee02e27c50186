use std::{env, sync::Arc};

use chrono::NaiveDate;
use jobdocs_config::{Config, ConfigManager};
use jobdocs_core::time::{Clock, SystemClock};
use jobdocs_domain::DocType;
use jobdocs_storage_csv::{CsvDocumentStorage, JobFolders};
use tracing::{debug, info};

use crate::cli::flows;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::prompts::{self, DialoguerPrompter, Prompter, ScriptPrompter};
use crate::errors::CliError;

/// Set to any value to read answers from stdin, one per line.
pub const SCRIPT_ENV: &str = "JOBDOCS_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuAction {
    CreateQuote,
    CreateInvoice,
    LogReceipt,
    EditQuote,
    Exit,
}

impl MainMenuAction {
    pub const ALL: [MainMenuAction; 5] = [
        MainMenuAction::CreateQuote,
        MainMenuAction::CreateInvoice,
        MainMenuAction::LogReceipt,
        MainMenuAction::EditQuote,
        MainMenuAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainMenuAction::CreateQuote => "Create Quote",
            MainMenuAction::CreateInvoice => "Create Invoice",
            MainMenuAction::LogReceipt => "Log Receipt",
            MainMenuAction::EditQuote => "Edit Existing Quote",
            MainMenuAction::Exit => "Exit",
        }
    }
}

/// Everything a flow needs: configuration, the job tree, storage and input.
pub struct ShellContext {
    pub mode: CliMode,
    pub config: Config,
    pub jobs: JobFolders,
    pub storage: CsvDocumentStorage,
    pub clock: Arc<dyn Clock>,
    pub prompter: Box<dyn Prompter>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::from_env()?;
        let config = manager.load()?;
        debug!(path = %manager.config_path().display(), "loaded configuration");

        let prompter: Box<dyn Prompter> = match mode {
            CliMode::Interactive => Box::new(DialoguerPrompter::new()),
            CliMode::Script => Box::new(ScriptPrompter::stdin()),
        };
        let color_enabled = config.ui_color_enabled && mode == CliMode::Interactive;
        output::set_preferences(OutputPreferences { color_enabled });

        Self::with_parts(mode, config, prompter, Arc::new(SystemClock))
    }

    pub fn with_parts(
        mode: CliMode,
        config: Config,
        prompter: Box<dyn Prompter>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let jobs = JobFolders::new(config.resolve_jobs_root())?;
        let storage = CsvDocumentStorage::with_clock(Arc::clone(&clock));
        Ok(Self {
            mode,
            config,
            jobs,
            storage,
            clock,
            prompter,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let mut context = ShellContext::new(CliMode::from_env())?;
    run_menu(&mut context)
}

/// Runs the main menu until the operator exits or input ends.
pub fn run_menu(context: &mut ShellContext) -> Result<(), CliError> {
    output::header("Contractor Quote & Invoice Tool");
    output::info(format!("Root jobs folder: {}", context.jobs.root().display()));

    let labels: Vec<&str> = MainMenuAction::ALL.iter().map(|a| a.label()).collect();
    loop {
        let index = match prompts::choose(context.prompter.as_mut(), "Select an option", &labels, 0)
        {
            Ok(index) => index,
            Err(CliError::InputClosed) => {
                info!("input closed at the main menu");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let result = match MainMenuAction::ALL[index] {
            MainMenuAction::CreateQuote => flows::create_document(context, DocType::Quote),
            MainMenuAction::CreateInvoice => flows::create_document(context, DocType::Invoice),
            MainMenuAction::LogReceipt => flows::log_receipts(context),
            MainMenuAction::EditQuote => flows::edit_quote(context),
            MainMenuAction::Exit => {
                output::info("Goodbye.");
                return Ok(());
            }
        };

        if let Err(err) = result {
            if err.ends_session() {
                info!("input closed during a flow");
                return Ok(());
            }
            output::error(&err);
        }
    }
}
