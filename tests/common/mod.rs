#![allow(dead_code)]

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use jobdocs::cli::{prompts::ScriptPrompter, CliMode, ShellContext};
use jobdocs_config::{Config, ConfigManager};
use jobdocs_core::time::FixedClock;
use tempfile::TempDir;

/// Menu answers that create the "Kitchen Remodel" quote for a new job:
/// one section, a 500.00 labor line and 5 x 25.00 of drywall.
pub const KITCHEN_QUOTE: &[&str] = &[
    "1",
    "",
    "Kitchen Remodel",
    "Pat Doe",
    "12 Main St",
    "1",
    "1",
    "Demo",
    "2",
    "Tear out cabinets",
    "Remove uppers and lowers",
    "500",
    "1",
    "3",
    "Drywall",
    "",
    "5",
    "25",
    "2",
    "4",
    "",
];

/// Isolated config home with its own jobs root.
pub struct TestEnv {
    pub home: TempDir,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let home = TempDir::new().expect("create temp dir");
        let config = Config {
            jobs_root: Some(home.path().join("jobs")),
            ui_color_enabled: false,
            ..Config::default()
        };
        ConfigManager::with_base_dir(home.path().to_path_buf())
            .expect("config manager")
            .save(&config)
            .expect("save config");
        Self { home, config }
    }

    pub fn jobs_root(&self) -> PathBuf {
        self.home.path().join("jobs")
    }

    /// Context whose prompts are answered by `answers`, one line each.
    pub fn context(&self, answers: &[&str]) -> ShellContext {
        let prompter = ScriptPrompter::new(Cursor::new(script(answers).into_bytes()));
        ShellContext::with_parts(
            CliMode::Script,
            self.config.clone(),
            Box::new(prompter),
            Arc::new(FixedClock(today())),
        )
        .expect("shell context")
    }

    /// The only folder whose name starts with `prefix`.
    pub fn job_dir(&self, prefix: &str) -> PathBuf {
        let mut dirs: Vec<PathBuf> = fs::read_dir(self.jobs_root())
            .expect("list jobs root")
            .map(|entry| entry.expect("entry").path())
            .filter(|path| {
                path.is_dir()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with(prefix))
            })
            .collect();
        assert_eq!(dirs.len(), 1, "expected one folder for {prefix}: {dirs:?}");
        dirs.remove(0)
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

pub fn script(answers: &[&str]) -> String {
    let mut text = answers.join("\n");
    text.push('\n');
    text
}

/// Answer lists concatenated in order.
pub fn answers<'a>(parts: &[&[&'a str]]) -> Vec<&'a str> {
    parts.iter().flat_map(|part| part.iter().copied()).collect()
}

pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("list folder")
        .map(|entry| entry.expect("entry").path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(extension))
        .collect();
    files.sort();
    files
}
