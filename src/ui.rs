//! User-facing output
//!
//! The report a maintainer reads goes through here: plain informational
//! lines on stdout, warnings and errors highlighted on stderr. In
//! verbose mode the engine narrates its progress as it goes
//! ("building an sdist: pkg-1.0.tar.gz: 23 files and directories"),
//! accumulating one line across several steps; [`Reporter`] keeps the
//! pending-line state so the pieces interleave cleanly with warnings.
//! Debug-level detail goes to `tracing` instead.

use std::io::{self, Write};

use colored::Colorize;

/// Stateful printer for the reconciliation report.
#[derive(Debug, Default)]
pub struct Reporter {
    verbose: bool,
    mid_line: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            mid_line: false,
        }
    }

    fn finish_pending_line(&mut self) {
        if self.mid_line {
            println!();
            self.mid_line = false;
        }
    }

    /// Print an informational message on its own line.
    pub fn info(&mut self, message: &str) {
        self.finish_pending_line();
        println!("{}", message);
    }

    /// Start a progress line (verbose mode only).
    pub fn info_begin(&mut self, message: &str) {
        if !self.verbose {
            return;
        }
        self.finish_pending_line();
        print!("{}", message);
        io::stdout().flush().ok();
        self.mid_line = true;
    }

    /// Continue the current progress line (verbose mode only).
    pub fn info_continue(&mut self, message: &str) {
        if !self.verbose {
            return;
        }
        print!("{}", message);
        io::stdout().flush().ok();
        self.mid_line = true;
    }

    /// Print a warning to stderr. Warnings never stop the run.
    pub fn warning(&mut self, message: &str) {
        self.finish_pending_line();
        eprintln!("{}", message.yellow());
    }

    /// Print an error to stderr.
    pub fn error(&mut self, message: &str) {
        self.finish_pending_line();
        eprintln!("{}", message.red());
    }
}

/// Indent every item by two spaces, one per line.
pub fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describe the two halves of a reconciliation diff.
pub fn format_missing(
    missing_from_a: &[String],
    missing_from_b: &[String],
    name_a: &str,
    name_b: &str,
) -> String {
    let mut res = Vec::new();
    if !missing_from_a.is_empty() {
        let mut sorted = missing_from_a.to_vec();
        sorted.sort();
        res.push(format!("missing from {}:\n{}", name_a, format_list(&sorted)));
    }
    if !missing_from_b.is_empty() {
        let mut sorted = missing_from_b.to_vec();
        sorted.sort();
        res.push(format!("missing from {}:\n{}", name_b, format_list(&sorted)));
    }
    res.join("\n")
}
