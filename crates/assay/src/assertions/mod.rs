//! Assertion helpers reporting through a [`Reporter`](crate::Reporter).
//!
//! [`Assert`] carries its configuration and diagnostic sink, so separate
//! tests can locate call sites differently without sharing mutable state.
//! Every operation is `#[track_caller]`.

mod checks;
mod temp_file;

use std::fmt;
use std::sync::Arc;

use crate::config::AssertConfig;
use crate::diagnostics::{self, Diagnostic, DiagnosticSink, StdoutSink};
use crate::location::CallerLocation;

/// Assertion helper bound to a configuration and a diagnostic sink
#[derive(Clone)]
pub struct Assert {
    config: AssertConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl fmt::Debug for Assert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assert")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Assert {
    fn default() -> Self {
        Self::new(AssertConfig::default())
    }
}

impl Assert {
    /// Creates a helper printing diagnostics to standard output.
    pub fn new(config: AssertConfig) -> Self {
        Self {
            config,
            sink: Arc::new(StdoutSink),
        }
    }

    /// Replaces the diagnostic sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    #[track_caller]
    fn emit(&self, message: &dyn fmt::Display, detail: Option<String>) {
        let location = CallerLocation::resolve(self.config.call_site);
        let mut diagnostic = Diagnostic::new(location, message);
        if let Some(detail) = detail {
            diagnostic = diagnostic.with_detail(detail);
        }
        diagnostics::report(self.sink.as_ref(), &diagnostic);
    }
}
