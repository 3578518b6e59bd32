use thiserror::Error;

/// Error types for the assertion helpers
#[derive(Debug, Error)]
pub enum AssayError {
    /// Call-site strategy could not be parsed
    #[error("Invalid call site: {0} (expected `caller` or `frames:<n>`)")]
    InvalidCallSite(String),

    /// Configuration value rejected
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
}

/// Result type for the assertion helpers
pub type AssayResult<T> = Result<T, AssayError>;
