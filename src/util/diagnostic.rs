//! User-facing error reports.
//!
//! A [`Diagnostic`] is the rendered form of a planning error: the message,
//! the context that led to it, an optional file, and numbered fixes.

use std::path::PathBuf;

/// Fixed hints printed for errors that are not [`crate::builder::PlanError`]s.
pub mod suggestions {
    /// No `Drydock.toml` above the working directory.
    pub const NO_GRAPH: &str = "help: Create a Drydock.toml describing the modules to plan";

    /// The preview listed nothing.
    pub const EMPTY_PREVIEW: &str = "help: Run `drydock plan` to see why no module could be planned";
}

const ERROR_COLORED: &str = "\x1b[1;31merror\x1b[0m";
const HELP_COLORED: &str = "\x1b[1;32mhelp\x1b[0m";

/// An error report with context lines and suggested fixes.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: String,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
    /// File the error concerns
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..Diagnostic::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for a terminal, with ANSI colors when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let (error, help) = if color {
            (ERROR_COLORED, HELP_COLORED)
        } else {
            ("error", "help")
        };

        let mut output = format!("{}: {}\n", error, self.message);
        if let Some(path) = &self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }
        for line in &self.context {
            output.push_str(&format!("  -> {}\n", line));
        }

        if !self.suggestions.is_empty() {
            output.push_str(&format!("\n{}: consider:\n", help));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
