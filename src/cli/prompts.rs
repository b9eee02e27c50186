//! Operator input.
//!
//! Interactive sessions go through dialoguer; script mode reads one answer per
//! stdin line so whole sessions can be replayed from a file.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use jobdocs_domain::parse_date;

use crate::cli::output;
use crate::errors::CliError;

/// Source of operator answers.
pub trait Prompter {
    /// One line of text. Empty answers are allowed.
    fn text(&mut self, prompt: &str) -> Result<String, CliError>;

    /// Index of the chosen entry in `items`.
    fn select(&mut self, prompt: &str, items: &[String], default: usize)
        -> Result<usize, CliError>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError>;
}

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: &str) -> Result<String, CliError> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }

    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize, CliError> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Reads answers line by line. Each answer is echoed after its prompt.
pub struct ScriptPrompter<R> {
    input: R,
}

impl ScriptPrompter<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> ScriptPrompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_answer(&mut self, prompt: &str) -> Result<String, CliError> {
        print!("{}: ", output::style_prompt(prompt));
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            println!();
            return Err(CliError::InputClosed);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        println!("{answer}");
        Ok(answer)
    }
}

impl<R: BufRead> Prompter for ScriptPrompter<R> {
    fn text(&mut self, prompt: &str) -> Result<String, CliError> {
        self.read_answer(prompt)
    }

    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize, CliError> {
        println!("{prompt}");
        for (index, item) in items.iter().enumerate() {
            output::detail(format!("{}. {}", index + 1, item));
        }
        let label = format!("Choice (1-{}, default {})", items.len(), default + 1);
        loop {
            let raw = self.read_answer(&label)?;
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(default);
            }
            match raw.parse::<usize>() {
                Ok(number) if (1..=items.len()).contains(&number) => return Ok(number - 1),
                _ => output::warning(format!(
                    "Please enter a number between 1 and {}.",
                    items.len()
                )),
            }
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError> {
        let hint = if default { "Y/n" } else { "y/N" };
        let label = format!("{prompt} [{hint}]");
        loop {
            let raw = self.read_answer(&label)?;
            match raw.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => output::warning("Please answer y or n."),
            }
        }
    }
}

/// Trimmed text answer.
pub fn ask_text(prompter: &mut dyn Prompter, prompt: &str) -> Result<String, CliError> {
    Ok(prompter.text(prompt)?.trim().to_string())
}

/// ENTER keeps `current`.
pub fn ask_text_or(
    prompter: &mut dyn Prompter,
    prompt: &str,
    current: &str,
) -> Result<String, CliError> {
    let answer = ask_text(prompter, &format!("{prompt} (ENTER to keep)"))?;
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}

/// Re-prompts until a non-negative number is entered.
pub fn ask_amount(prompter: &mut dyn Prompter, prompt: &str) -> Result<f64, CliError> {
    loop {
        if let Some(value) = ask_optional_amount(prompter, prompt)? {
            return Ok(value);
        }
        output::warning("Please enter a number (e.g. 10 or 10.5).");
    }
}

/// ENTER keeps `current`.
pub fn ask_amount_or(
    prompter: &mut dyn Prompter,
    prompt: &str,
    current: f64,
) -> Result<f64, CliError> {
    let label = format!("{prompt} (current {current:.2}, ENTER to keep)");
    Ok(ask_optional_amount(prompter, &label)?.unwrap_or(current))
}

/// `None` for a blank answer; anything else must be a non-negative number.
pub fn ask_optional_amount(
    prompter: &mut dyn Prompter,
    prompt: &str,
) -> Result<Option<f64>, CliError> {
    loop {
        let raw = ask_text(prompter, prompt)?;
        if raw.is_empty() {
            return Ok(None);
        }
        match parse_amount(&raw) {
            Some(value) => return Ok(Some(value)),
            None => output::warning("Please enter a non-negative number (e.g. 10 or 10.5)."),
        }
    }
}

/// Accepts `1,250.50` and `$80` as well as plain numbers.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Re-prompts until an `MM-DD-YYYY` date is entered.
pub fn ask_date(prompter: &mut dyn Prompter, prompt: &str) -> Result<NaiveDate, CliError> {
    loop {
        let raw = ask_text(prompter, &format!("{prompt} (MM-DD-YYYY)"))?;
        match parse_date(&raw) {
            Some(date) => return Ok(date),
            None => output::warning("Invalid date format. Use MM-DD-YYYY."),
        }
    }
}

/// ENTER keeps `current`; malformed dates re-prompt.
pub fn ask_date_or(
    prompter: &mut dyn Prompter,
    prompt: &str,
    current: NaiveDate,
) -> Result<NaiveDate, CliError> {
    loop {
        let raw = ask_text(prompter, &format!("{prompt} (MM-DD-YYYY, ENTER to keep)"))?;
        if raw.is_empty() {
            return Ok(current);
        }
        match parse_date(&raw) {
            Some(date) => return Ok(date),
            None => output::warning("Invalid date format. Use MM-DD-YYYY."),
        }
    }
}

/// Select over string labels.
pub fn choose<S: AsRef<str>>(
    prompter: &mut dyn Prompter,
    prompt: &str,
    items: &[S],
    default: usize,
) -> Result<usize, CliError> {
    let labels: Vec<String> = items.iter().map(|item| item.as_ref().to_string()).collect();
    prompter.select(prompt, &labels, default)
}
