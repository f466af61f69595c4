//! Diagnostic records, the compiler stream parser, and terminal rendering.
//!
//! Compiler output is consumed line by line by the [`DiagnosticParser`] state
//! machine, which counts errors and warnings and reports each diagnostic once
//! its block of output is complete. Diagnostics produced by the engine itself
//! (unresolvable includes) are accumulated in a thread-safe [`DiagnosticSink`]
//! and rendered in the same compiler style by the [`TerminalRenderer`].

#![warn(missing_docs)]

pub mod diagnostic;
pub mod parser;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use diagnostic::{Diagnostic, Location, Snippet};
pub use parser::{DiagnosticParser, ParserState};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
