//! Reporter for Rust's built-in test harness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::reporter::Reporter;

/// Test context for `#[test]` functions.
///
/// The built-in harness only knows about panics, so marked failures are
/// remembered and raised as a panic when the reporter goes out of scope.
/// `abort_now` panics right away.
///
/// ```should_panic
/// use assay::TestReporter;
///
/// let t = TestReporter::new("totals");
/// assay::assert_equal(&t, &(2 + 2), &5, "sum should match");
/// // still running here; the test fails when `t` is dropped
/// ```
#[derive(Debug)]
pub struct TestReporter {
    name: String,
    failed: AtomicBool,
}

impl TestReporter {
    /// Creates a reporter for the named test.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed: AtomicBool::new(false),
        }
    }

    /// Creates a reporter named after the current thread.
    ///
    /// The test harness names its worker threads after the running test.
    pub fn current() -> Self {
        let name = thread::current().name().unwrap_or("test").to_string();
        Self::new(name)
    }

    /// Runs `body` with a reporter scoped to it.
    ///
    /// Recorded failures panic once `body` returns.
    pub fn run<T, F>(name: impl Into<String>, body: F) -> T
    where
        F: FnOnce(&TestReporter) -> T,
    {
        let reporter = Self::new(name);
        body(&reporter)
    }

    /// Test name used in failure messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a failure was recorded.
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl Reporter for TestReporter {
    fn mark_failed(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    fn abort_now(&self) -> ! {
        self.failed.store(true, Ordering::SeqCst);
        panic!("test `{}` aborted", self.name);
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.failed() && !thread::panicking() {
            panic!("test `{}` failed", self.name);
        }
    }
}
