//! Terminal output for a run.
//!
//! Normal output and verbose details go to stdout. Warnings go to stderr and
//! are never silenced, so `--json` output on stdout stays parseable.
//!
//! # Examples
//!
//! ```
//! use pdfrepeat::output::formatter::{OutputFormatter, Verbosity};
//!
//! let formatter = OutputFormatter::new(Verbosity::Normal);
//! formatter.info("Rendering pages...");
//! formatter.success("Done");
//! ```

use colored::Colorize;
use std::io::IsTerminal;

use crate::config::Config;

/// How much the formatter prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings only.
    Quiet,
    /// Progress and results.
    Normal,
    /// Plan details and per-worker lines as well.
    Verbose,
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Plain,
    Good,
    Caution,
    Trace,
}

impl Tone {
    fn prefix(self) -> &'static str {
        match self {
            Tone::Plain => "",
            Tone::Good => "✓ ",
            Tone::Caution => "⚠ ",
            Tone::Trace => "→ ",
        }
    }
}

/// Prints plan and summary lines at a fixed verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    verbosity: Verbosity,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter. Color is used only on a terminal; `colored`
    /// also honors `NO_COLOR` and `CLICOLOR`.
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            colored: std::io::stdout().is_terminal(),
        }
    }

    /// Create a formatter from configuration.
    ///
    /// A dry run prints its plan even in quiet mode.
    pub fn from_config(config: &Config) -> Self {
        let verbosity = if !config.should_print() {
            Verbosity::Quiet
        } else if config.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Self::new(verbosity)
    }

    /// Create a formatter that prints warnings only.
    pub fn quiet() -> Self {
        Self::new(Verbosity::Quiet)
    }

    /// The verbosity in effect.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether anything besides warnings is printed.
    pub fn should_print(&self) -> bool {
        self.verbosity > Verbosity::Quiet
    }

    /// Whether verbose lines are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    pub fn info(&self, message: &str) {
        self.emit(Verbosity::Normal, Tone::Plain, message);
    }

    pub fn success(&self, message: &str) {
        self.emit(Verbosity::Normal, Tone::Good, message);
    }

    /// Print a warning to stderr at every verbosity.
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.paint(Tone::Caution, message));
    }

    pub fn debug(&self, message: &str) {
        self.emit(Verbosity::Verbose, Tone::Trace, message);
    }

    /// Print `label: value`, verbose only.
    pub fn detail(&self, label: &str, value: &str) {
        self.emit(Verbosity::Verbose, Tone::Plain, &format!("  {label:<10} {value}"));
    }

    /// Print one row of the worker table.
    pub fn table_row(&self, columns: &[&str]) {
        self.emit(Verbosity::Normal, Tone::Plain, &format!("  {}", columns.join(" │ ")));
    }

    pub fn heading(&self, title: &str) {
        self.emit(Verbosity::Normal, Tone::Plain, title);
    }

    pub fn blank_line(&self) {
        self.emit(Verbosity::Normal, Tone::Plain, "");
    }

    fn emit(&self, needs: Verbosity, tone: Tone, message: &str) {
        if self.verbosity >= needs {
            println!("{}", self.paint(tone, message));
        }
    }

    fn paint(&self, tone: Tone, message: &str) -> String {
        let line = format!("{}{message}", tone.prefix());
        if !self.colored {
            return line;
        }
        match tone {
            Tone::Plain => line,
            Tone::Good => line.green().to_string(),
            Tone::Caution => line.yellow().to_string(),
            Tone::Trace => line.cyan().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Verbosity::Quiet, false, false)]
    #[case(Verbosity::Normal, true, false)]
    #[case(Verbosity::Verbose, true, true)]
    fn test_verbosity_gates(
        #[case] verbosity: Verbosity,
        #[case] prints: bool,
        #[case] verbose: bool,
    ) {
        let formatter = OutputFormatter::new(verbosity);
        assert_eq!(formatter.should_print(), prints);
        assert_eq!(formatter.is_verbose(), verbose);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::new("tile.png", 8, "out.pdf");
        assert_eq!(
            OutputFormatter::from_config(&config).verbosity(),
            Verbosity::Normal
        );

        config.verbose = true;
        assert_eq!(
            OutputFormatter::from_config(&config).verbosity(),
            Verbosity::Verbose
        );

        config.verbose = false;
        config.quiet = true;
        assert_eq!(
            OutputFormatter::from_config(&config).verbosity(),
            Verbosity::Quiet
        );

        // A dry run prints its plan even when quiet.
        config.dry_run = true;
        assert!(OutputFormatter::from_config(&config).should_print());
    }

    #[test]
    fn test_paint_without_color() {
        let formatter = OutputFormatter {
            verbosity: Verbosity::Normal,
            colored: false,
        };
        assert_eq!(formatter.paint(Tone::Good, "done"), "✓ done");
        assert_eq!(formatter.paint(Tone::Plain, "text"), "text");
    }

    #[test]
    fn test_paint_with_color() {
        let formatter = OutputFormatter {
            verbosity: Verbosity::Normal,
            colored: true,
        };
        // Whether escapes are emitted is up to the terminal; the text is not.
        assert!(formatter.paint(Tone::Caution, "careful").contains("⚠ careful"));
        assert_eq!(formatter.paint(Tone::Plain, "text"), "text");
    }
}
