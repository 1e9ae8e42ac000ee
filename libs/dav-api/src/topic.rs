use std::fmt;

use serde::{Deserialize, Serialize};

/// Record type bound to a topic. Used as the tag when minting topic ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Need,
    Bid,
    Mission,
    Message,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Need => "need",
            RecordKind::Bid => "bid",
            RecordKind::Mission => "mission",
            RecordKind::Message => "message",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque name of a destination on the message log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TopicId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TopicId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for TopicId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How the topic for an operation is obtained.
///
/// - `Explicit`: caller already owns a provisioned topic; used as-is.
/// - `Generated`: a fresh id is minted for the kind and created on the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSpec {
    Explicit(TopicId),
    Generated(RecordKind),
}

impl TopicSpec {
    /// Explicit topic when one is supplied, otherwise generate one for `kind`.
    pub fn or_generate(topic: Option<TopicId>, kind: RecordKind) -> Self {
        match topic {
            Some(id) => TopicSpec::Explicit(id),
            None => TopicSpec::Generated(kind),
        }
    }

    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            TopicSpec::Explicit(_) => None,
            TopicSpec::Generated(kind) => Some(*kind),
        }
    }
}
