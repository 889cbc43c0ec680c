//! Terminal prompt for resend confirmations.

use std::io;

use console::{Term, style};
use remessa_core::ConfirmPrompt;

/// Interactive stdin/stdout prompt backed by `console::Term`.
pub struct TermPrompt {
    term: Term,
}

impl TermPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Printed once before the first question.
    pub fn preamble(&self, count: usize) -> io::Result<()> {
        self.term.write_line(&format!(
            "{} {count} document(s) in the inbox were already sent.",
            style("ℹ").blue()
        ))?;
        self.term
            .write_line("Answer: S (resend), N (skip) or NT (skip all remaining)")
    }
}

impl ConfirmPrompt for TermPrompt {
    fn ask(&mut self, file_name: &str) -> io::Result<String> {
        self.term
            .write_line(&format!("Resend \"{file_name}\"? [S/N/NT]"))?;
        self.term.read_line()
    }

    fn invalid(&mut self, _input: &str) {
        let _ = self
            .term
            .write_line("Answer must be S (yes), N (no) or NT (no to all remaining)");
    }
}
