//! Failure signaling towards the host test framework.

/// The test-execution context assertions report failures to.
///
/// `mark_failed` records a failure and lets the test keep running.
/// `abort_now` records a failure and stops the current test immediately;
/// it never returns, implementations unwind.
pub trait Reporter {
    /// Record a failure, execution continues
    fn mark_failed(&self);

    /// Record a failure and stop the current test
    fn abort_now(&self) -> !;
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn mark_failed(&self) {
        (**self).mark_failed()
    }

    fn abort_now(&self) -> ! {
        (**self).abort_now()
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn mark_failed(&self) {
        (**self).mark_failed()
    }

    fn abort_now(&self) -> ! {
        (**self).abort_now()
    }
}
