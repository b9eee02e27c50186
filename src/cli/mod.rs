pub mod flows;
pub mod output;
pub mod prompts;
mod shell;

pub use shell::{run_cli, run_menu, CliMode, MainMenuAction, ShellContext, SCRIPT_ENV};
