//! Structured logging for test binaries.
//!
//! Failed assertions are logged as `warn` events under the `assay` target
//! with `file`, `line`, `message` and `detail` fields, next to the plain
//! diagnostics on standard output.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "assay=warn";

static INIT: OnceCell<()> = OnceCell::new();

/// Installs a `tracing` subscriber writing through the test harness's
/// output capture. Safe to call from every test; only the first call has
/// an effect.
pub fn init_test_logging() {
    INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // The test binary may already have installed its own subscriber
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .try_init();
    });
}
