use std::io;

use jobdocs_config::ConfigError;
use jobdocs_core::CoreError;
use thiserror::Error;

/// Failures surfaced by the interactive front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Could not render page: {0}")]
    Render(#[from] askama::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Stdin reached end of input while a prompt was waiting.
    #[error("Input closed")]
    InputClosed,
}

impl CliError {
    /// True when the session cannot continue and the menu loop should stop.
    pub fn ends_session(&self) -> bool {
        matches!(self, CliError::InputClosed)
    }
}
