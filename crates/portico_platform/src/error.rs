//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Named resource is absent from the bundle
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Underlying native call failed or returned an invalid result
    #[error("I/O error: {0}")]
    Io(String),

    /// The native thread-hop could not be scheduled (for example during
    /// teardown)
    #[error("Native bridge unavailable: {0}")]
    BridgeUnavailable(String),

    /// Operation not supported on this OS
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// Platform layer was not (or could not be) initialized
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> Self {
        PlatformError::Io(err.to_string())
    }
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
