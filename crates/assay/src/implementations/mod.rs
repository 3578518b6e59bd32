//! Reporter implementations.
//!
//! [`TestReporter`] adapts the assertions to Rust's built-in test harness.
//! [`RecordingReporter`] is an in-memory fake host that observes failures
//! without failing the enclosing test, for exercising assertion helpers.

pub mod libtest;
pub mod recording;

// Re-export all implementations for easy access
pub use libtest::*;
pub use recording::*;
