//! User confirmation for the mirror workflow.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tabled::{Table, Tabled, settings::Style};

#[cfg(test)]
use mockall::automock;

/// How the listed deletion candidates should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMode {
    /// Delete every candidate.
    All,
    /// Delete nothing.
    None,
    /// Ask for each candidate.
    Each,
}

/// Trait for interactive decisions. Can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait Prompter {
    /// Present the deletion candidates before asking about them.
    fn show_candidates(&mut self, candidates: &[PathBuf]);

    /// Choose what to do with `count` candidates.
    fn deletion_mode(&mut self, count: usize) -> DeletionMode;

    /// Confirm a single candidate; defaults to yes.
    fn confirm_entity(&mut self, path: &Path) -> bool;

    /// Confirm the synchronisation run; defaults to yes.
    fn confirm_sync(&mut self) -> bool;
}

/// Parse the answer to the deletion mode question.
///
/// `a` deletes all, `n` deletes none, anything else prompts for each.
pub fn parse_deletion_mode(answer: &str) -> DeletionMode {
    match answer.trim().to_lowercase().as_str() {
        "a" => DeletionMode::All,
        "n" => DeletionMode::None,
        _ => DeletionMode::Each,
    }
}

/// Parse a `[Y/n]` answer: everything except `n` means yes.
pub fn parse_yes_default(answer: &str) -> bool {
    answer.trim().to_lowercase() != "n"
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Deletion candidate")]
    path: String,
}

/// Render candidates as a table.
pub fn candidates_table(candidates: &[PathBuf]) -> String {
    let rows = candidates
        .iter()
        .enumerate()
        .map(|(i, path)| CandidateRow {
            index: i + 1,
            path: path.display().to_string(),
        });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Prompter reading answers from a terminal (or any reader/writer pair).
///
/// End of input answers every question negatively so a closed stdin never
/// deletes anything.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one answer; `None` on end of input.
    fn ask(&mut self, question: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{}", question).and_then(|_| self.output.flush()) {
            tracing::warn!(error = %e, "failed to write prompt");
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) => None,
            Ok(_) => Some(answer),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read answer");
                None
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn show_candidates(&mut self, candidates: &[PathBuf]) {
        if candidates.is_empty() {
            return;
        }
        if let Err(e) = writeln!(self.output, "{}", candidates_table(candidates)) {
            tracing::warn!(error = %e, "failed to print candidates");
        }
    }

    fn deletion_mode(&mut self, _count: usize) -> DeletionMode {
        self.ask("\nDelete [a]ll, [n]one or prompt for each (default)? : ")
            .map(|answer| parse_deletion_mode(&answer))
            .unwrap_or(DeletionMode::None)
    }

    fn confirm_entity(&mut self, path: &Path) -> bool {
        self.ask(&format!("Delete {} [Y/n]: ", path.display()))
            .is_some_and(|answer| parse_yes_default(&answer))
    }

    fn confirm_sync(&mut self) -> bool {
        self.ask("\nProceed with synchronization? [Y/n]: ")
            .is_some_and(|answer| parse_yes_default(&answer))
    }
}
