//! Call-site resolution for failure diagnostics.
//!
//! Two strategies are supported:
//!
//! * [`CallSite::Caller`] reads the location token propagated by
//!   `#[track_caller]`. Helpers that wrap the assertions stay transparent as
//!   long as they are annotated with `#[track_caller]` too.
//! * [`CallSite::Frames`] captures a backtrace and walks it upward. Frames of
//!   this crate are skipped first; `Frames(1)` then names the immediate caller
//!   of the assertion and every extra skip climbs one wrapper frame. The count
//!   must match the number of wrapper frames, otherwise the reported location
//!   is simply wrong.

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::str::FromStr;

use crate::error::AssayError;

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Strategy used to locate the source position of a failing assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSite {
    /// Location token propagated through `#[track_caller]`
    #[default]
    Caller,
    /// Number of frames to climb past this crate's own frames
    Frames(usize),
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSite::Caller => write!(f, "caller"),
            CallSite::Frames(skips) => write!(f, "frames:{}", skips),
        }
    }
}

impl FromStr for CallSite {
    type Err = AssayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value {
            "caller" => Ok(CallSite::Caller),
            "frames" => Ok(CallSite::Frames(1)),
            _ => value
                .strip_prefix("frames:")
                .and_then(|skips| skips.trim().parse::<usize>().ok())
                .map(CallSite::Frames)
                .ok_or_else(|| AssayError::InvalidCallSite(s.to_string())),
        }
    }
}

/// Source position of an assertion call, file base name and line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerLocation {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for CallerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl CallerLocation {
    /// Creates a location, keeping only the base name of `path`.
    pub fn new(path: &str, line: u32) -> Self {
        let file = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path)
            .to_string();
        Self { file, line }
    }

    /// Location of the nearest caller not annotated with `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// Resolves the call site using the given strategy.
    ///
    /// Frame walking falls back to the `#[track_caller]` location when the
    /// backtrace carries no usable frame, e.g. without debug info.
    #[track_caller]
    pub fn resolve(call_site: CallSite) -> Self {
        let tracked = Self::caller();
        match call_site {
            CallSite::Caller => tracked,
            CallSite::Frames(skips) => {
                let trace = Backtrace::force_capture().to_string();
                Self::from_backtrace(&trace, CRATE_PREFIX, skips).unwrap_or(tracked)
            }
        }
    }

    /// Picks the frame `skips` levels above the innermost block of frames
    /// whose symbols belong to `crate_prefix`.
    ///
    /// `skips == 0` selects the outermost frame of that block.
    pub fn from_backtrace(trace: &str, crate_prefix: &str, skips: usize) -> Option<Self> {
        let frames = parse_frames(trace);
        let first = frames
            .iter()
            .position(|frame| is_crate_frame(frame.symbol, crate_prefix))?;
        let block = frames[first..]
            .iter()
            .take_while(|frame| is_crate_frame(frame.symbol, crate_prefix))
            .count();
        let entry = first + block - 1;

        let (file, line) = frames.get(entry.checked_add(skips)?)?.location?;
        Some(Self::new(file, line))
    }
}

#[derive(Debug)]
struct Frame<'a> {
    symbol: &'a str,
    location: Option<(&'a str, u32)>,
}

// Reads the `std::backtrace::Backtrace` display format:
//
//    3: my_crate::tests::it_works
//              at ./src/lib.rs:42:9
//
// Inlined symbols are printed without an index and count as their own frame.
fn parse_frames(trace: &str) -> Vec<Frame<'_>> {
    let mut frames: Vec<Frame<'_>> = Vec::new();
    for raw in trace.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(at) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.location.is_none() {
                    frame.location = parse_source_position(at);
                }
            }
            continue;
        }

        let symbol = match line.split_once(": ") {
            Some((index, symbol)) if index.chars().all(|c| c.is_ascii_digit()) => symbol,
            _ => line,
        };
        frames.push(Frame {
            symbol,
            location: None,
        });
    }
    frames
}

// "path/to/file.rs:LINE:COLUMN"
fn parse_source_position(at: &str) -> Option<(&str, u32)> {
    let mut parts = at.rsplitn(3, ':');
    let _column = parts.next()?;
    let line = parts.next()?.parse().ok()?;
    let file = parts.next()?;
    Some((file, line))
}

fn is_crate_frame(symbol: &str, crate_prefix: &str) -> bool {
    symbol.starts_with(crate_prefix)
        || symbol
            .strip_prefix('<')
            .is_some_and(|rest| rest.starts_with(crate_prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TRACE: &str = "   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:312:9
   1: helper::location::CallerLocation::resolve
             at ./crates/helper/src/location.rs:97:29
   2: helper::assert::Assert::require_no_error
             at ./crates/helper/src/assert.rs:60:28
   3: <helper::implementations::Fake as helper::reporter::Reporter>::abort_now
   4: suite::setup_fixture
             at ./tests/suite/fixtures.rs:12:5
   5: suite::loads_fixture
             at ./tests/suite/main.rs:30:5
   6: core::ops::function::FnOnce::call_once
             at /rustc/abc/library/core/src/ops/function.rs:250:5
";

    #[test]
    fn test_call_site_parse() {
        assert_eq!("caller".parse::<CallSite>().unwrap(), CallSite::Caller);
        assert_eq!("frames".parse::<CallSite>().unwrap(), CallSite::Frames(1));
        assert_eq!("frames:3".parse::<CallSite>().unwrap(), CallSite::Frames(3));
        assert_eq!(" frames: 0 ".parse::<CallSite>().unwrap(), CallSite::Frames(0));
        assert!("frames:x".parse::<CallSite>().is_err());
        assert!("callee".parse::<CallSite>().is_err());
    }

    #[test]
    fn test_call_site_display_round_trips() {
        for call_site in [CallSite::Caller, CallSite::Frames(4)] {
            assert_eq!(call_site.to_string().parse::<CallSite>().unwrap(), call_site);
        }
    }

    #[test]
    fn test_location_keeps_base_name() {
        let location = CallerLocation::new("/home/dev/project/tests/parser_test.rs", 17);
        assert_eq!(location.file, "parser_test.rs");
        assert_eq!(location.to_string(), "parser_test.rs:17");

        assert_eq!(CallerLocation::new("lib.rs", 3).file, "lib.rs");
    }

    #[test]
    fn test_caller_reports_this_file() {
        let line = line!() + 1;
        let location = CallerLocation::caller();
        assert_eq!(location, CallerLocation::new(file!(), line));
    }

    #[test]
    fn test_resolve_caller_strategy() {
        let line = line!() + 1;
        let location = CallerLocation::resolve(CallSite::Caller);
        assert_eq!(location.file, "location.rs");
        assert_eq!(location.line, line);
    }

    #[test]
    fn test_from_backtrace_skips() {
        let immediate = CallerLocation::from_backtrace(TRACE, "helper::", 1).unwrap();
        assert_eq!(immediate, CallerLocation::new("fixtures.rs", 12));

        let wrapped = CallerLocation::from_backtrace(TRACE, "helper::", 2).unwrap();
        assert_eq!(wrapped, CallerLocation::new("main.rs", 30));

        let outermost = CallerLocation::from_backtrace(TRACE, "helper::", 3).unwrap();
        assert_eq!(outermost, CallerLocation::new("function.rs", 250));
    }

    #[test]
    fn test_from_backtrace_zero_skips_names_entry_point() {
        // Frame 3 is the entry point but has no source position
        assert_eq!(CallerLocation::from_backtrace(TRACE, "helper::", 0), None);

        let trimmed = TRACE.replace(
            "   3: <helper::implementations::Fake as helper::reporter::Reporter>::abort_now\n",
            "",
        );
        let entry = CallerLocation::from_backtrace(&trimmed, "helper::", 0).unwrap();
        assert_eq!(entry, CallerLocation::new("assert.rs", 60));
    }

    #[test]
    fn test_from_backtrace_without_match() {
        assert_eq!(CallerLocation::from_backtrace(TRACE, "other::", 1), None);
        assert_eq!(CallerLocation::from_backtrace(TRACE, "helper::", 9), None);
        assert_eq!(CallerLocation::from_backtrace("", "helper::", 1), None);
        assert_eq!(CallerLocation::from_backtrace(TRACE, "helper::", usize::MAX), None);
    }

    #[test]
    fn test_parse_inlined_symbols() {
        let trace = "   0: outer::run
             at ./src/run.rs:4:1
             inner::step
             at ./src/step.rs:9:2
";
        let frames = parse_frames(trace);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].symbol, "inner::step");
        assert_eq!(frames[1].location, Some(("./src/step.rs", 9)));
    }
}
