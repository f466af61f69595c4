//! Compiler-style diagnostic records.

use crate::severity::Severity;
use std::fmt;

/// A `file:line:column` position as printed by GCC-compatible compilers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// The file as spelled by the reporter (not necessarily project-relative).
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// The offending source line of a diagnostic, with the span to underline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    /// The full source line, without its line terminator.
    pub text: String,
    /// 0-based character offset of the underlined span within `text`.
    pub start: usize,
    /// Width of the underlined span in characters (at least 1 is drawn).
    pub width: usize,
}

/// A single error, warning, or note.
///
/// Diagnostics either come from the compiler's output stream (via
/// [`DiagnosticParser`](crate::DiagnosticParser)) or are synthesized by the
/// engine itself, in which case they usually carry a [`Snippet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity level.
    pub severity: Severity,
    /// Where the diagnostic points.
    pub location: Location,
    /// The message text following the severity label.
    pub message: String,
    /// The source line to echo under the header, if known.
    pub snippet: Option<Snippet>,
}

impl Diagnostic {
    /// Creates a diagnostic without a snippet.
    pub fn new(severity: Severity, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
            snippet: None,
        }
    }

    /// Creates a fatal-error diagnostic.
    pub fn fatal(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, location, message)
    }

    /// Attaches the offending source line.
    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    /// Returns the one-line `SUM:` recap printed after a diagnostic's block.
    pub fn summary_line(&self) -> String {
        format!("SUM: {}: {}: {}", self.location, self.severity, self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)
    }
}
