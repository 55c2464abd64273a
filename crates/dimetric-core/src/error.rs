//! Shared error type across dimetric crates.

use thiserror::Error;

/// Stable error codes (used in logs and by callers matching on failures).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Config failed to parse or validate.
    InvalidConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Reading a source or writing a sink failed.
    Io,
    /// Collector input was malformed.
    Parse,
    /// A handler rejected or failed to emit a batch.
    Handler,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Io => "IO",
            ErrorCode::Parse => "PARSE",
            ErrorCode::Handler => "HANDLER",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DimetricError>;

/// Unified error type used by core and pipeline.
#[derive(Debug, Error)]
pub enum DimetricError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("handler: {0}")]
    Handler(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl DimetricError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DimetricError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            DimetricError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            DimetricError::Io(_) => ErrorCode::Io,
            DimetricError::Parse(_) => ErrorCode::Parse,
            DimetricError::Handler(_) => ErrorCode::Handler,
            DimetricError::Internal(_) => ErrorCode::Internal,
        }
    }
}
