//! Collection point for diagnostics raised outside the compiler.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Batches diagnostics so discovery can report every bad include at once.
///
/// Shared by reference; emitting only needs `&self`.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    inner: Mutex<Batch>,
}

#[derive(Debug, Default)]
struct Batch {
    pending: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        let mut batch = self.batch();
        match diag.severity {
            s if s.is_error() => batch.errors += 1,
            Severity::Warning => batch.warnings += 1,
            _ => {}
        }
        tracing::debug!(diagnostic = %diag.summary_line(), "recorded");
        batch.pending.push(diag);
    }

    /// `true` once an error or fatal diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Errors and fatal errors recorded since creation.
    pub fn error_count(&self) -> usize {
        self.batch().errors
    }

    /// Warnings recorded since creation.
    pub fn warning_count(&self) -> usize {
        self.batch().warnings
    }

    /// Removes and returns the pending diagnostics in emission order.
    ///
    /// Counts are kept.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.batch().pending)
    }

    /// A copy of the pending diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.batch().pending.clone()
    }

    fn batch(&self) -> MutexGuard<'_, Batch> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
