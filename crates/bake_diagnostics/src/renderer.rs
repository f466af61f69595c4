//! Terminal rendering of diagnostics and raw compiler output.

use crate::diagnostic::Diagnostic;

const RESET: &str = "\x1b[0m";
const BRIGHT_RED: &str = "\x1b[91m";
const BRIGHT_MAGENTA: &str = "\x1b[95m";
const BRIGHT_CYAN: &str = "\x1b[96m";

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic, including its trailing blank line.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in the GCC terminal format.
///
/// Produces output like:
/// ```text
/// src/main.c:3:10: fatal error: missing.h: No such file or directory
///  #include "missing.h"
///           ^~~~~~~~~~~
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Tints the `error:`, `warning:` and `note:` labels of a raw output line.
    pub fn colorize(&self, line: &str) -> String {
        if !self.color {
            return line.to_string();
        }
        line.replace("error:", &format!("{BRIGHT_RED}error:{RESET}"))
            .replace("warning:", &format!("{BRIGHT_MAGENTA}warning:{RESET}"))
            .replace("note:", &format!("{BRIGHT_CYAN}note:{RESET}"))
    }

    /// Renders the `SUM:` recap of a completed diagnostic followed by two
    /// blank lines.
    pub fn render_summary(&self, diag: &Diagnostic) -> String {
        format!("{}\n\n\n", self.colorize(&diag.summary_line()))
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = self.colorize(&diag.to_string());
        out.push('\n');

        if let Some(snippet) = &diag.snippet {
            out.push_str(&format!(" {}\n", snippet.text.trim_end()));
            let padding = " ".repeat(snippet.start + 1);
            let tildes = "~".repeat(snippet.width.saturating_sub(1));
            out.push_str(&format!("{padding}^{tildes}\n"));
        }

        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Location, Snippet};
    use crate::severity::Severity;

    #[test]
    fn colorize_disabled_is_identity() {
        let r = TerminalRenderer::new(false);
        assert_eq!(r.colorize("a.c:1:1: error: x"), "a.c:1:1: error: x");
    }

    #[test]
    fn colorize_tints_labels() {
        let r = TerminalRenderer::new(true);
        let line = r.colorize("a.c:1:1: warning: x");
        assert!(line.contains("\x1b[95mwarning:\x1b[0m"));
        let line = r.colorize("a.c:1:1: note: y");
        assert!(line.contains("\x1b[96mnote:\x1b[0m"));
        let line = r.colorize("a.c:1:1: fatal error: z");
        assert!(line.contains("fatal \x1b[91merror:\x1b[0m"));
    }

    #[test]
    fn summary_has_two_blank_lines() {
        let r = TerminalRenderer::new(false);
        let diag = Diagnostic::new(Severity::Error, Location::new("a.c", 1, 2), "bad");
        assert_eq!(r.render_summary(&diag), "SUM: a.c:1:2: error: bad\n\n\n");
    }

    #[test]
    fn render_with_snippet_underlines_quoted_name() {
        let r = TerminalRenderer::new(false);
        let text = "#include \"missing.h\"".to_string();
        let diag = Diagnostic::fatal(
            Location::new("src/main.c", 3, 10),
            "missing.h: No such file or directory",
        )
        .with_snippet(Snippet {
            text,
            start: 9,
            width: 11,
        });
        let out = r.render(&diag);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "src/main.c:3:10: fatal error: missing.h: No such file or directory"
        );
        assert_eq!(lines[1], " #include \"missing.h\"");
        assert_eq!(lines[2], "          ^~~~~~~~~~~");
        assert!(out.ends_with("\n\n"));
        // caret sits under the opening quote
        assert_eq!(lines[2].find('^'), lines[1].find('"'));
    }

    #[test]
    fn render_without_snippet() {
        let r = TerminalRenderer::new(false);
        let diag = Diagnostic::fatal(Location::new("src/a.c", 1, 1), "gone");
        assert_eq!(r.render(&diag), "src/a.c:1:1: fatal error: gone\n\n");
    }
}
