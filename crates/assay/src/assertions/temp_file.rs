//! Temporary file fixtures.

use std::io::{self, Write};
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use super::Assert;
use crate::reporter::Reporter;

impl Assert {
    /// Creates a temporary file holding `content` and returns its path.
    ///
    /// The file is written and closed before returning and is not removed
    /// afterwards; deleting it is up to the caller. Any failure while
    /// creating, writing or closing aborts the test. A file that is still
    /// unpersisted when the abort unwinds is removed by `tempfile`.
    #[track_caller]
    pub fn create_file<R>(&self, reporter: &R, content: impl AsRef<[u8]>) -> PathBuf
    where
        R: Reporter + ?Sized,
    {
        let content = content.as_ref();

        let mut builder = Builder::new();
        builder.prefix(&self.config.temp_prefix);
        let created = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut file = self.require_no_error(
            reporter,
            created,
            "Expected no error creating temporary file",
        );

        let written = file.write_all(content);
        self.require_no_error(reporter, written, "Expected no error writing to temporary file");

        let closed = close(file);
        let path = self.require_no_error(
            reporter,
            closed,
            "Expected no error closing temporary file",
        );

        debug!(path = %path.display(), bytes = content.len(), "Created temporary file");
        path
    }
}

// Detaches the file from automatic removal, then flushes and closes it
fn close(file: NamedTempFile) -> io::Result<PathBuf> {
    let (file, path) = file.keep().map_err(|e| e.error)?;
    file.sync_all()?;
    Ok(path)
}
