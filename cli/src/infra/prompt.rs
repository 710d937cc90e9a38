//! Infrastructure implementation of the `Prompter` port.

use anyhow::Result;
use console::Term;
use dialoguer::{Confirm, Input, Select};

use crate::application::ports::Prompter;

/// Prompts on the controlling terminal.
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn show(&self, message: &str) -> Result<()> {
        self.term.write_str(message)?;
        self.term.flush()?;
        Ok(())
    }

    fn read_key(&self) -> Result<char> {
        Ok(self.term.read_char()?)
    }

    fn answer(&self, text: &str) -> Result<()> {
        self.term.write_line(text)?;
        Ok(())
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn select(&self, prompt: &str, choices: &[&str], default: usize) -> Result<usize> {
        let picked = Select::new()
            .with_prompt(prompt)
            .items(choices)
            .default(default)
            .interact()?;
        Ok(picked)
    }

    fn toggle(&self, prompt: &str, default: bool) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
