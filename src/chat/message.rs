//! Chat log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::MessageId;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Typed by the visitor.
    User,
    /// Produced by the chatbot.
    Bot,
}

impl Origin {
    /// Whether the message came from the chatbot.
    #[must_use]
    pub const fn is_bot(self) -> bool {
        matches!(self, Self::Bot)
    }
}

/// One entry of a session log. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    text: String,
    origin: Origin,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a message stamped with the current time.
    ///
    /// Callers pass text that is already trimmed and non-empty.
    pub(crate) fn new(id: MessageId, text: String, origin: Origin) -> Self {
        Self {
            id,
            text,
            origin,
            timestamp: Utc::now(),
        }
    }

    /// Message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Message content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Author of the message.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Creation instant.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
