//! Failure diagnostics and where they are written.

use parking_lot::Mutex;
use std::fmt;
use tracing::warn;

use crate::location::CallerLocation;

/// A failure message tied to the call site of the failing assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: CallerLocation,
    pub message: String,
    pub detail: Option<String>,
}

impl Diagnostic {
    /// Single-line diagnostic.
    pub fn new(location: CallerLocation, message: impl fmt::Display) -> Self {
        Self {
            location,
            message: message.to_string(),
            detail: None,
        }
    }

    /// Adds a second line describing the failure.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Renders the diagnostic as printed to standard output.
    ///
    /// Each line is `\t<file>:<line>: <text>`; the two-line form is followed
    /// by a blank line.
    pub fn render(&self) -> String {
        let mut out = format!("\t{}: {}\n", self.location, self.message);
        if let Some(detail) = &self.detail {
            out.push_str(&format!("\t{}: {}\n\n", self.location, detail));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Destination of failure diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Writes diagnostics to standard output through `print!`, so the test
/// harness's output capture applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        print!("{}", diagnostic.render());
    }
}

/// Keeps diagnostics in memory for inspection in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics emitted so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Everything emitted so far, as it would have been printed.
    pub fn rendered(&self) -> String {
        self.diagnostics.lock().iter().map(Diagnostic::render).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().is_empty()
    }

    pub fn clear(&self) {
        self.diagnostics.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.diagnostics.lock().push(diagnostic.clone());
    }
}

/// Sends a diagnostic to `sink` and mirrors it as a structured log event.
pub(crate) fn report(sink: &dyn DiagnosticSink, diagnostic: &Diagnostic) {
    warn!(
        file = %diagnostic.location.file,
        line = diagnostic.location.line,
        message = %diagnostic.message,
        detail = diagnostic.detail.as_deref(),
        "assertion failed"
    );
    sink.emit(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn location() -> CallerLocation {
        CallerLocation::new("src/widget_test.rs", 42)
    }

    #[test]
    fn test_render_single_line() {
        let diagnostic = Diagnostic::new(location(), "expected an error");
        assert_eq!(diagnostic.render(), "\twidget_test.rs:42: expected an error\n");
    }

    #[test]
    fn test_render_with_detail() {
        let diagnostic = Diagnostic::new(location(), "setup failed").with_detail("disk full");
        assert_eq!(
            diagnostic.render(),
            "\twidget_test.rs:42: setup failed\n\twidget_test.rs:42: disk full\n\n"
        );
        assert_eq!(diagnostic.to_string(), diagnostic.render());
    }

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        report(&sink, &Diagnostic::new(location(), "first"));
        report(&sink, &Diagnostic::new(location(), "second").with_detail("why"));

        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(
            sink.rendered(),
            "\twidget_test.rs:42: first\n\twidget_test.rs:42: second\n\twidget_test.rs:42: why\n\n"
        );

        sink.clear();
        assert!(sink.is_empty());
    }
}
