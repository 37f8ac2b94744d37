//! Shared error type across imtap crates.

use thiserror::Error;

/// Failure categories used for log fields and metric labels (stable strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No decoder/handler for the method. Not an error, only counted.
    UnknownType,
    /// Payload bytes do not match the schema for a known method.
    Decode,
    /// Interpreter failed after a successful decode.
    Handler,
    /// Envelope could not be unwrapped at the ingestion boundary.
    Transport,
    /// Decode + handle exceeded the per-task budget.
    Timeout,
    /// Dispatch queue was full.
    Overloaded,
    /// Startup configuration problem.
    Config,
    /// Anything else.
    Internal,
}

impl FailureKind {
    /// String representation used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::UnknownType => "UNKNOWN_TYPE",
            FailureKind::Decode => "DECODE_ERROR",
            FailureKind::Handler => "HANDLER_ERROR",
            FailureKind::Transport => "TRANSPORT_ERROR",
            FailureKind::Timeout => "TIMEOUT",
            FailureKind::Overloaded => "OVERLOADED",
            FailureKind::Config => "CONFIG",
            FailureKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ImTapError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum ImTapError {
    #[error("decode failed (method={method}, len={len}): {reason}")]
    Decode {
        method: String,
        len: usize,
        reason: String,
    },
    #[error("handler failed (method={method}): {reason}")]
    Handler { method: String, reason: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("dispatch queue full")]
    Overloaded,
    #[error("config: {0}")]
    Config(String),
    #[error("duplicate registration for method: {0}")]
    DuplicateRegistration(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl ImTapError {
    /// Map to a stable failure category.
    pub fn kind(&self) -> FailureKind {
        match self {
            ImTapError::Decode { .. } => FailureKind::Decode,
            ImTapError::Handler { .. } => FailureKind::Handler,
            ImTapError::Transport(_) => FailureKind::Transport,
            ImTapError::Timeout(_) => FailureKind::Timeout,
            ImTapError::Overloaded => FailureKind::Overloaded,
            ImTapError::Config(_)
            | ImTapError::DuplicateRegistration(_)
            | ImTapError::UnsupportedVersion => FailureKind::Config,
            ImTapError::Internal(_) => FailureKind::Internal,
        }
    }

    pub fn handler(method: impl Into<String>, reason: impl Into<String>) -> Self {
        ImTapError::Handler {
            method: method.into(),
            reason: reason.into(),
        }
    }
}
