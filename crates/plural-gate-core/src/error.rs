//! Shared error type across plural-gate crates.

use thiserror::Error;

/// Stable error codes, used in startup error logs and asserted by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Unsupported config or descriptor version.
    UnsupportedVersion,
    /// Classification oracle unreachable or misbehaving.
    Oracle,
    /// Host (homeserver) call failed.
    Host,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// Stable string form.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Oracle => "ORACLE",
            ErrorCode::Host => "HOST",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GateError>;

/// Unified error type used by core and runtime.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),
    #[error("oracle timed out")]
    OracleTimeout,
    #[error("oracle: {0}")]
    Oracle(String),
    #[error("host: {0}")]
    Host(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GateError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            GateError::BadRequest(_) => ErrorCode::BadRequest,
            GateError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            GateError::OracleTimeout | GateError::Oracle(_) => ErrorCode::Oracle,
            GateError::Host(_) => ErrorCode::Host,
            GateError::Internal(_) => ErrorCode::Internal,
        }
    }
}
