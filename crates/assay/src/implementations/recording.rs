//! Recording reporter for testing assertion helpers.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::reporter::Reporter;

/// Unwind payload raised by [`RecordingReporter::abort_now`]
struct Aborted;

/// Final state of a run observed by a [`RecordingReporter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No failure recorded
    Passed,
    /// Failures were marked and the body ran to completion
    Failed,
    /// The body was stopped by `abort_now`
    Aborted,
}

/// Thread-safe in-memory reporter.
///
/// Aborts unwind with a private payload through
/// [`std::panic::resume_unwind`], so no panic message is printed.
/// [`RecordingReporter::run`] catches that payload and nothing else.
#[derive(Default)]
pub struct RecordingReporter {
    failures: AtomicUsize,
    aborted: AtomicBool,
}

impl fmt::Debug for RecordingReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingReporter")
            .field("failures", &self.failures())
            .field("aborted", &self.aborted())
            .finish()
    }
}

impl RecordingReporter {
    /// Creates a reporter with no recorded failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `mark_failed` calls.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Whether `abort_now` was called.
    pub fn aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Whether any failure, marked or aborting, was recorded.
    pub fn failed(&self) -> bool {
        self.failures() > 0 || self.aborted()
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        if self.aborted() {
            Outcome::Aborted
        } else if self.failures() > 0 {
            Outcome::Failed
        } else {
            Outcome::Passed
        }
    }

    /// Clears recorded failures.
    pub fn reset(&self) {
        self.failures.store(0, Ordering::SeqCst);
        self.aborted.store(false, Ordering::SeqCst);
    }

    /// Runs `body` as a test body against this reporter.
    ///
    /// An abort stops `body` and is reported as [`Outcome::Aborted`]. Any
    /// other panic is propagated unchanged.
    pub fn run<F>(&self, body: F) -> Outcome
    where
        F: FnOnce(&Self),
    {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| body(self))) {
            if !payload.is::<Aborted>() {
                panic::resume_unwind(payload);
            }
        }
        self.outcome()
    }
}

impl Reporter for RecordingReporter {
    fn mark_failed(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn abort_now(&self) -> ! {
        self.aborted.store(true, Ordering::SeqCst);
        panic::resume_unwind(Box::new(Aborted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_run() {
        let reporter = RecordingReporter::new();
        assert_eq!(reporter.run(|_| {}), Outcome::Passed);
        assert!(!reporter.failed());
    }

    #[test]
    fn test_marked_failures_continue() {
        let reporter = RecordingReporter::new();
        let mut reached = false;

        let outcome = reporter.run(|t| {
            t.mark_failed();
            t.mark_failed();
            reached = true;
        });

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(reporter.failures(), 2);
        assert!(reached);
    }

    #[test]
    fn test_abort_stops_body() {
        let reporter = RecordingReporter::new();
        let mut reached = false;

        let outcome = reporter.run(|t| {
            t.abort_now();
            #[allow(unreachable_code)]
            {
                reached = true;
            }
        });

        assert_eq!(outcome, Outcome::Aborted);
        assert!(reporter.aborted());
        assert!(!reached);
    }

    #[test]
    fn test_reset() {
        let reporter = RecordingReporter::new();
        reporter.run(|t| t.abort_now());
        reporter.reset();
        assert_eq!(reporter.outcome(), Outcome::Passed);
    }

    #[test]
    #[should_panic(expected = "unrelated")]
    fn test_other_panics_propagate() {
        let reporter = RecordingReporter::new();
        reporter.run(|_| panic!("unrelated"));
    }
}
