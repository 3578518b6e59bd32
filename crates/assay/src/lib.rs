//! Assertion and fixture helpers for Rust test suites.
//!
//! The helpers report failures to a [`Reporter`], the test-execution context:
//!
//! * [`require_no_error`] and [`require_error`] abort the test on failure,
//! * [`assert_equal`] and [`assert_contains`] mark the test failed and let it
//!   continue, so one test can report several independent failures,
//! * [`create_file`] writes a temporary file fixture.
//!
//! Each failure prints the call site of the failing assertion:
//!
//! ```text
//! 	parser_test.rs:42: tokens should match
//! 	parser_test.rs:42: ["a", "b"] != ["a", "c"]
//! ```
//!
//! The free functions use a shared [`Assert`] configured from the
//! environment (see [`AssertConfig::load`]). Build an [`Assert`] directly to
//! configure call-site resolution or diagnostics per test.

pub mod assertions;
pub mod config;
pub mod deep_eq;
pub mod diagnostics;
pub mod error;
pub mod implementations;
pub mod location;
pub mod logging;
pub mod reporter;

use once_cell::sync::Lazy;
use std::fmt::{Debug, Display};
use std::path::PathBuf;

pub use assertions::Assert;
pub use config::AssertConfig;
pub use deep_eq::{deep_equal, DeepEq, Visited};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, StdoutSink};
pub use error::{AssayError, AssayResult};
pub use implementations::{Outcome, RecordingReporter, TestReporter};
pub use location::{CallSite, CallerLocation};
pub use logging::init_test_logging;
pub use reporter::Reporter;

static DEFAULT: Lazy<Assert> = Lazy::new(|| Assert::new(AssertConfig::load()));

/// The helper behind the crate-level functions.
pub fn default_assert() -> &'static Assert {
    &DEFAULT
}

/// Verifies that `result` is `Ok` and returns its value, aborting the test otherwise.
///
/// See [`Assert::require_no_error`].
#[track_caller]
pub fn require_no_error<R, T, E>(reporter: &R, result: Result<T, E>, msg: impl Display) -> T
where
    R: Reporter + ?Sized,
    E: Display,
{
    DEFAULT.require_no_error(reporter, result, msg)
}

/// Verifies that `result` is `Err` and returns the error, aborting the test otherwise.
///
/// See [`Assert::require_error`].
#[track_caller]
pub fn require_error<R, T, E>(reporter: &R, result: Result<T, E>, msg: impl Display) -> E
where
    R: Reporter + ?Sized,
{
    DEFAULT.require_error(reporter, result, msg)
}

/// Verifies structural equality, marking the test failed otherwise.
///
/// See [`Assert::assert_equal`].
#[track_caller]
pub fn assert_equal<R, T>(reporter: &R, actual: &T, expected: &T, msg: impl Display)
where
    R: Reporter + ?Sized,
    T: DeepEq + Debug + ?Sized,
{
    DEFAULT.assert_equal(reporter, actual, expected, msg)
}

/// Verifies that `part` is a substring of `total`, marking the test failed otherwise.
///
/// See [`Assert::assert_contains`].
#[track_caller]
pub fn assert_contains<R>(reporter: &R, total: &str, part: &str, msg: impl Display)
where
    R: Reporter + ?Sized,
{
    DEFAULT.assert_contains(reporter, total, part, msg)
}

/// Creates a temporary file with `content` and returns its path. The caller
/// deletes it.
///
/// See [`Assert::create_file`].
#[track_caller]
pub fn create_file<R>(reporter: &R, content: impl AsRef<[u8]>) -> PathBuf
where
    R: Reporter + ?Sized,
{
    DEFAULT.create_file(reporter, content)
}
