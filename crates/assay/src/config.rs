//! Configuration for the assertion helpers
//!
//! Configuration is owned by each [`Assert`](crate::Assert) value. The
//! defaults used by the crate-level free functions are read once from the
//! environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::error::{AssayError, AssayResult};
use crate::location::CallSite;

/// Environment variable selecting the call-site strategy (`caller` or `frames:<n>`)
pub const ENV_CALL_SITE: &str = "ASSAY_CALL_SITE";
/// Environment variable holding a frame-skip count, shorthand for `frames:<n>`
pub const ENV_SKIPS: &str = "ASSAY_SKIPS";
/// Environment variable overriding the temporary file name prefix
pub const ENV_TEMP_PREFIX: &str = "ASSAY_TEMP_PREFIX";
/// Environment variable overriding the temporary file directory
pub const ENV_TEMP_DIR: &str = "ASSAY_TEMP_DIR";

/// Assertion helper configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertConfig {
    /// How the failing call site is located
    #[serde(default)]
    pub call_site: CallSite,

    /// Prefix for generated temporary file names
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,

    /// Directory for temporary files, the platform default when unset
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

fn default_temp_prefix() -> String {
    "assay".to_string()
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            call_site: CallSite::default(),
            temp_prefix: default_temp_prefix(),
            temp_dir: None,
        }
    }
}

impl AssertConfig {
    /// Configuration locating call sites by skipping `skips` frames.
    pub fn with_skips(skips: usize) -> Self {
        Self {
            call_site: CallSite::Frames(skips),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Invalid values are logged and the default is kept.
    pub fn load() -> Self {
        let vars: HashMap<String, String> = env::vars()
            .filter(|(key, _)| key.starts_with("ASSAY_"))
            .collect();

        let mut config = Self::default();
        for (key, value) in Self::ordered(&vars) {
            if let Err(e) = config.apply(key, value) {
                warn!(error = %e, "Ignoring assertion helper setting");
            }
        }
        config
    }

    /// Build configuration from a key/value map, rejecting invalid values.
    ///
    /// Keys use the environment variable names. Unknown keys are ignored.
    pub fn from_env_map(vars: &HashMap<String, String>) -> AssayResult<Self> {
        let mut config = Self::default();
        for (key, value) in Self::ordered(vars) {
            config.apply(key, value)?;
        }
        Ok(config)
    }

    // ASSAY_CALL_SITE is applied after ASSAY_SKIPS so it wins when both are set
    fn ordered(vars: &HashMap<String, String>) -> impl Iterator<Item = (&'static str, &str)> {
        [ENV_SKIPS, ENV_CALL_SITE, ENV_TEMP_PREFIX, ENV_TEMP_DIR]
            .into_iter()
            .filter_map(move |key| vars.get(key).map(|value| (key, value.as_str())))
    }

    fn apply(&mut self, key: &str, value: &str) -> AssayResult<()> {
        match key {
            ENV_CALL_SITE => {
                self.call_site = value.parse()?;
            }
            ENV_SKIPS => {
                let skips = value.trim().parse::<usize>().map_err(|_| {
                    AssayError::InvalidConfig {
                        key: key.to_string(),
                        value: value.to_string(),
                    }
                })?;
                self.call_site = CallSite::Frames(skips);
            }
            ENV_TEMP_PREFIX => {
                if value.contains(std::path::is_separator) {
                    return Err(AssayError::InvalidConfig {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
                self.temp_prefix = value.to_string();
            }
            ENV_TEMP_DIR => {
                self.temp_dir = Some(PathBuf::from(value));
            }
            _ => {}
        }
        Ok(())
    }
}
