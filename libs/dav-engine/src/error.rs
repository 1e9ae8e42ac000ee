use std::fmt;

use dav_api::{ConfigError, LogError, RegistrarError};

/// Registrar operation; names the endpoint path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PublishNeed,
    PublishBid,
    NeedsForType,
}

impl Operation {
    /// Path segment of the registrar endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::PublishNeed => "publishNeed",
            Operation::PublishBid => "publishBid",
            Operation::NeedsForType => "needsForType",
        }
    }

    /// What is being registered, for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::PublishNeed => "Need",
            Operation::PublishBid => "Bid",
            Operation::NeedsForType => "Needs",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// Topic creation failed; nothing was published or subscribed.
    #[error("Topic registration failed: {0}")]
    TopicProvisioning(#[source] LogError),

    /// Registrar rejected the post. `source` is the registrar error untouched.
    #[error("{label} registration failed: {source}", label = .operation.label())]
    Registration {
        operation: Operation,
        #[source]
        source: RegistrarError,
    },

    #[error("message send failed: {0}")]
    Send(#[source] LogError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

impl CoordinatorError {
    /// Underlying registrar failure, if this is a registration error.
    pub fn registrar_error(&self) -> Option<&RegistrarError> {
        match self {
            CoordinatorError::Registration { source, .. } => Some(source),
            _ => None,
        }
    }
}
