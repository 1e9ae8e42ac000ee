use std::fmt;

/// Category of a message-log failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorKind {
    /// Broker rejected the operation (create, subscribe, send).
    Broker,
    /// Topic does not exist on the log.
    NotFound,
    /// Payload could not be encoded or decoded.
    Decode,
    /// Log connection or subscription was closed underneath us.
    Closed,
}

impl fmt::Display for LogErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogErrorKind::Broker => f.write_str("broker"),
            LogErrorKind::NotFound => f.write_str("not found"),
            LogErrorKind::Decode => f.write_str("decode"),
            LogErrorKind::Closed => f.write_str("closed"),
        }
    }
}

/// Error reported by a `MessageLog` implementation.
///
/// Cloneable so a single failure can be relayed on a stream and still be
/// compared against the original by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogError {
    kind: LogErrorKind,
    message: String,
}

impl LogError {
    pub fn broker(msg: impl Into<String>) -> Self {
        Self { kind: LogErrorKind::Broker, message: msg.into() }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self { kind: LogErrorKind::NotFound, message: msg.into() }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self { kind: LogErrorKind::Decode, message: msg.into() }
    }

    pub fn closed(msg: impl Into<String>) -> Self {
        Self { kind: LogErrorKind::Closed, message: msg.into() }
    }

    pub fn kind(&self) -> LogErrorKind {
        self.kind
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LogError {}

impl From<serde_json::Error> for LogError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}

/// Error reported by a `Registrar` when posting to the network registrar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrarError {
    /// Request never produced a response (connect, DNS, timeout...).
    #[error("{0}")]
    Transport(String),

    /// Registrar answered with a non-2xx status.
    #[error("registrar responded {status}: {body}")]
    Status { status: u16, body: String },

    /// Request body could not be serialized.
    #[error("encode request body: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for RegistrarError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e.to_string())
    }
}
