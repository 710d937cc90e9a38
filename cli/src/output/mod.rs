//! Terminal output for siteforge commands.
//!
//! Installer progress goes through [`TerminalReporter`]. Everything a
//! command prints on its own (catalogue tables, `config show`, the
//! cancellation notice and the final error line) goes through
//! [`OutputContext`].

pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Styling and verbosity shared by every command of one invocation.
pub struct OutputContext {
    pub styles: Styles,
    /// Suppresses everything except errors and soft-skip warnings.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY, without `--no-color` and `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let mut styles = Styles::default();
        if !no_color && Term::stdout().is_term() && std::env::var_os("NO_COLOR").is_none() {
            styles.colorize();
        }
        Self { styles, quiet }
    }

    /// `✓ {msg}` after a completed change.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Notice printed when the user declined a workflow-wide question.
    pub fn cancelled(&self) {
        if !self.quiet {
            println!("  {}", "Cancelled.".style(self.styles.warning));
        }
    }

    /// Title above a table such as `Applications` or `Configuration`.
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("{}", title.style(self.styles.header));
        }
    }

    /// One table line: `label` padded to `width`, then `value`.
    pub fn row(&self, label: &str, width: usize, value: &str) {
        if !self.quiet {
            println!("{}", self.row_text(label, width, value));
        }
    }

    #[must_use]
    pub fn row_text(&self, label: &str, width: usize, value: &str) -> String {
        let padded = format!("{label:<width$}");
        format!("  {}  {value}", padded.style(self.styles.dim))
            .trim_end()
            .to_string()
    }

    /// `Error: {msg}` on stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {msg}", "Error:".style(self.styles.error));
    }
}
