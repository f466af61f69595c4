//! Destinations for compiler output.

use std::io::Write;

/// Where a compilation task writes its echoed command line and diagnostics.
pub trait OutputSink {
    /// Appends raw text.
    fn write_str(&mut self, text: &str);

    /// Appends `text` followed by a newline.
    fn line(&mut self, text: &str) {
        self.write_str(text);
        self.write_str("\n");
    }
}

/// Writes straight to standard error.
#[derive(Debug, Default)]
pub struct Console;

impl OutputSink for Console {
    fn write_str(&mut self, text: &str) {
        // Nothing sensible can be done if stderr is gone.
        let _ = std::io::stderr().lock().write_all(text.as_bytes());
    }
}

/// Collects output in memory until it can be flushed in one piece.
#[derive(Debug, Default)]
pub struct Buffered {
    text: String,
}

impl Buffered {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the buffer, returning the collected text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl OutputSink for Buffered {
    fn write_str(&mut self, text: &str) {
        self.text.push_str(text);
    }
}
