//! Line-oriented parser for GCC-compatible compiler diagnostic streams.
//!
//! A diagnostic spans several lines of compiler output: the header line
//! (`file:line:col: error: message`), the echoed source, the caret line, and
//! any number of notes. The parser only learns that a diagnostic is complete
//! when the next header arrives or the stream ends, so it holds the current
//! diagnostic in a pending state until then.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::diagnostic::{Diagnostic, Location};
use crate::severity::Severity;

static MESSAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*):(\d+):(\d+):\s+(fatal error|error|warning):\s+(.*)$")
        .expect("diagnostic header pattern is valid")
});

static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*):(\d+):(\d+):\s+note:\s+(.*)$").expect("note pattern is valid")
});

/// Marker text of notes that point back through a macro expansion chain.
const EXPANSION_MARKER: &str = "in expansion";

/// The parser's state between two lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ParserState {
    /// No diagnostic has been seen since the last flush.
    #[default]
    Idle,
    /// A diagnostic header was seen; its block may still be continuing.
    Pending(Diagnostic),
}

/// State machine turning raw compiler output lines into diagnostics.
///
/// Feed every line with [`feed`](Self::feed); a returned diagnostic is the
/// previous one, now known to be complete. Call [`finish`](Self::finish) at
/// end of stream to flush the last one.
#[derive(Debug, Default)]
pub struct DiagnosticParser {
    state: ParserState,
    errors: usize,
    warnings: usize,
}

impl DiagnosticParser {
    /// Creates a parser in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one line of output (a trailing line terminator is ignored).
    ///
    /// Returns the previously pending diagnostic when this line starts a new
    /// one. Notes mentioning a macro expansion move the pending diagnostic's
    /// location to the note's location, keeping severity and message, so the
    /// recap points at the invocation site rather than the macro body.
    pub fn feed(&mut self, line: &str) -> Option<Diagnostic> {
        let line = line.trim_end_matches(['\n', '\r']);

        if let Some(caps) = MESSAGE_RE.captures(line) {
            let (location, label, message) = match split_header(&caps) {
                Some(parts) => parts,
                None => return None,
            };
            let severity = Severity::from_label(label)?;
            if severity.is_error() {
                self.errors += 1;
            } else {
                self.warnings += 1;
            }
            let next = ParserState::Pending(Diagnostic::new(severity, location, message));
            return match std::mem::replace(&mut self.state, next) {
                ParserState::Pending(done) => Some(done),
                ParserState::Idle => None,
            };
        }

        if let Some(caps) = NOTE_RE.captures(line) {
            let message = caps.get(4).map_or("", |m| m.as_str());
            if message.contains(EXPANSION_MARKER) {
                if let (ParserState::Pending(diag), Some(location)) =
                    (&mut self.state, parse_location(&caps))
                {
                    diag.location = location;
                }
            }
        }

        None
    }

    /// Ends the stream, returning the pending diagnostic if there is one.
    pub fn finish(&mut self) -> Option<Diagnostic> {
        match std::mem::take(&mut self.state) {
            ParserState::Pending(diag) => Some(diag),
            ParserState::Idle => None,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Number of error and fatal-error headers seen so far.
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Number of warning headers seen so far.
    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

fn parse_location(caps: &Captures<'_>) -> Option<Location> {
    let file = caps.get(1)?.as_str();
    let line = caps.get(2)?.as_str().parse().ok()?;
    let column = caps.get(3)?.as_str().parse().ok()?;
    Some(Location::new(file, line, column))
}

fn split_header<'a>(caps: &Captures<'a>) -> Option<(Location, &'a str, &'a str)> {
    let location = parse_location(caps)?;
    let label = caps.get(4)?.as_str();
    let message = caps.get(5)?.as_str();
    Some((location, label, message))
}
