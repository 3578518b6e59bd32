//! Error, equality and substring checks.

use std::fmt::{Debug, Display};

use super::Assert;
use crate::deep_eq::{deep_equal, DeepEq};
use crate::reporter::Reporter;

impl Assert {
    /// Verifies that `result` is `Ok` and returns its value.
    ///
    /// On `Err` prints `msg` and the error, then aborts the test.
    #[track_caller]
    pub fn require_no_error<R, T, E>(
        &self,
        reporter: &R,
        result: Result<T, E>,
        msg: impl Display,
    ) -> T
    where
        R: Reporter + ?Sized,
        E: Display,
    {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.emit(&msg, Some(err.to_string()));
                reporter.abort_now()
            }
        }
    }

    /// Verifies that `result` is `Err` and returns the error.
    ///
    /// On `Ok` prints `msg`, then aborts the test.
    #[track_caller]
    pub fn require_error<R, T, E>(
        &self,
        reporter: &R,
        result: Result<T, E>,
        msg: impl Display,
    ) -> E
    where
        R: Reporter + ?Sized,
    {
        match result {
            Ok(_) => {
                self.emit(&msg, None);
                reporter.abort_now()
            }
            Err(err) => err,
        }
    }

    /// Verifies that `actual` is structurally equal to `expected`.
    ///
    /// On mismatch prints `msg` and both values, marks the test failed and
    /// returns.
    #[track_caller]
    pub fn assert_equal<R, T>(&self, reporter: &R, actual: &T, expected: &T, msg: impl Display)
    where
        R: Reporter + ?Sized,
        T: DeepEq + Debug + ?Sized,
    {
        if !deep_equal(actual, expected) {
            self.emit(&msg, Some(format!("{:?} != {:?}", actual, expected)));
            reporter.mark_failed();
        }
    }

    /// Verifies that `part` occurs in `total`. An empty `part` always does.
    ///
    /// On failure prints `msg` and both strings, marks the test failed and
    /// returns.
    #[track_caller]
    pub fn assert_contains<R>(&self, reporter: &R, total: &str, part: &str, msg: impl Display)
    where
        R: Reporter + ?Sized,
    {
        if !total.contains(part) {
            self.emit(&msg, Some(format!("{:?} doesn't contain {:?}", total, part)));
            reporter.mark_failed();
        }
    }
}
