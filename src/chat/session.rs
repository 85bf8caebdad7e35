//! Conversation session: the ordered message log and its submission guard.
//!
//! Submitting is split in two synchronous halves. [`ConversationSession::begin_submit`]
//! validates the input, appends the visitor's message and raises the pending
//! flag; [`ConversationSession::complete`] appends the reply and clears it.
//! Whatever runs between the two (normally the response resolver) never holds
//! the session, which is how concurrent submissions get to observe `pending`.

use thiserror::Error;

use super::ids::{MessageId, SessionId};
use super::message::{Message, Origin};
use crate::config::DEFAULT_OWNER_NAME;
use crate::resolver::FallbackClassifier;

/// Topics offered as quick suggestions on a fresh session.
pub const SUGGESTION_TOPICS: [&str; 3] = ["Projects", "Skills", "Experience"];

/// Build the built-in greeting for the given owner.
#[must_use]
pub fn default_greeting(owner_name: &str) -> String {
    format!(
        "Hey there! 👋✨ I'm {owner_name}'s AI buddy and his biggest fan! 🤖💜 I know everything \
         about him - his incredible projects, amazing skills, and why he's such an awesome \
         developer! 🚀\n\nWhat would you like to discover about {owner_name} today? I'm super \
         excited to share his story! 😊🌟"
    )
}

/// Why a submission was ignored.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Blank or whitespace-only text.
    #[error("message is empty")]
    Empty,
    /// A reply is still being resolved.
    #[error("a reply is already pending")]
    Pending,
}

/// A reply token was redeemed against a session that did not issue it.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("reply token from session {issued_by} cannot complete session {session}")]
pub struct ForeignReply {
    /// Session the token was redeemed against.
    pub session: SessionId,
    /// Session that issued the token.
    pub issued_by: SessionId,
}

/// Token for an accepted submission, redeemed by [`ConversationSession::complete`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an accepted submission must be completed to clear the pending flag"]
pub struct PendingReply {
    session: SessionId,
    prompt: String,
    user_message: MessageId,
}

impl PendingReply {
    /// Session that accepted the submission.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Trimmed text the visitor submitted.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Identifier of the appended visitor message.
    #[must_use]
    pub const fn user_message(&self) -> MessageId {
        self.user_message
    }
}

/// One chat's message log and submission lifecycle.
#[derive(Debug)]
pub struct ConversationSession {
    id: SessionId,
    owner_name: String,
    messages: Vec<Message>,
    next_id: MessageId,
    pending: bool,
    draft: String,
}

impl ConversationSession {
    /// Start a session seeded with the built-in greeting.
    #[must_use]
    pub fn initialize() -> Self {
        Self::for_owner(DEFAULT_OWNER_NAME, None)
    }

    /// Start a session seeded with a custom greeting.
    ///
    /// A blank greeting falls back to the built-in one so the log always
    /// starts with a non-empty bot message.
    #[must_use]
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self::for_owner(DEFAULT_OWNER_NAME, Some(greeting.into()))
    }

    /// Start a session about `owner_name`, optionally with a custom greeting.
    #[must_use]
    pub fn for_owner(owner_name: &str, greeting: Option<String>) -> Self {
        let greeting = greeting
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| default_greeting(owner_name));

        let seed = Message::new(MessageId::FIRST, greeting, Origin::Bot);
        let session = Self {
            id: SessionId::new(),
            owner_name: owner_name.to_string(),
            messages: vec![seed],
            next_id: MessageId::FIRST.next(),
            pending: false,
            draft: String::new(),
        };
        tracing::debug!(session_id = %session.id, "chat session opened");
        session
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The log, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false`: the greeting is seeded at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether a reply is being resolved.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Current unsent input.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the unsent input.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Quick prompts offered while the conversation has not started.
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        if self.messages.len() != 1 || self.pending {
            return Vec::new();
        }
        SUGGESTION_TOPICS
            .iter()
            .map(|topic| {
                format!(
                    "Tell me about {}'s {}",
                    self.owner_name,
                    topic.to_lowercase()
                )
            })
            .collect()
    }

    /// Accept a visitor message.
    ///
    /// On success the message is already in the log, `pending` is set and the
    /// draft is cleared. The returned token must be passed to
    /// [`complete`](Self::complete) with the reply.
    ///
    /// # Errors
    /// Returns [`SubmitRejection::Empty`] for blank text and
    /// [`SubmitRejection::Pending`] while a reply is outstanding. Neither
    /// touches the log.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingReply, SubmitRejection> {
        let prompt = text.trim();
        if prompt.is_empty() {
            tracing::debug!(session_id = %self.id, "ignoring empty submission");
            return Err(SubmitRejection::Empty);
        }
        if self.pending {
            tracing::debug!(session_id = %self.id, "ignoring submission while a reply is pending");
            return Err(SubmitRejection::Pending);
        }

        let user_message = self.append(prompt.to_string(), Origin::User);
        self.pending = true;
        self.draft.clear();

        Ok(PendingReply {
            session: self.id,
            prompt: prompt.to_string(),
            user_message,
        })
    }

    /// Append the reply for an accepted submission and clear `pending`.
    ///
    /// Returns the identifier of the appended bot message.
    ///
    /// # Errors
    /// Returns [`ForeignReply`] if `pending` was issued by another session.
    /// The log and the pending flag are left untouched.
    #[allow(clippy::needless_pass_by_value)]
    pub fn complete(
        &mut self,
        pending: PendingReply,
        reply: &str,
    ) -> Result<MessageId, ForeignReply> {
        if pending.session != self.id {
            tracing::warn!(
                session_id = %self.id,
                issued_by = %pending.session,
                "ignoring reply token from another session"
            );
            return Err(ForeignReply {
                session: self.id,
                issued_by: pending.session,
            });
        }

        let id = self.append_reply(reply);
        tracing::debug!(
            session_id = %self.id,
            question = %pending.user_message,
            answer = %id,
            "reply appended"
        );
        Ok(id)
    }

    /// Answer the outstanding submission after its token was lost.
    ///
    /// Returns `None` when nothing is pending.
    pub(crate) fn abandon(&mut self, reply: &str) -> Option<MessageId> {
        if !self.pending {
            return None;
        }
        let id = self.append_reply(reply);
        tracing::warn!(session_id = %self.id, answer = %id, "pending submission answered without its token");
        Some(id)
    }

    fn append_reply(&mut self, reply: &str) -> MessageId {
        let reply = reply.trim();
        let text = if reply.is_empty() {
            // The resolver never yields an empty reply; keep the log invariant anyway.
            tracing::warn!(session_id = %self.id, "empty reply replaced with generic response");
            FallbackClassifier::for_owner(&self.owner_name).generic_response()
        } else {
            reply.to_string()
        };

        let id = self.append(text, Origin::Bot);
        self.pending = false;
        id
    }

    fn append(&mut self, text: String, origin: Origin) -> MessageId {
        let id = self.next_id;
        self.messages.push(Message::new(id, text, origin));
        self.next_id = id.next();
        id
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::initialize()
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        tracing::debug!(session_id = %self.id, messages = self.messages.len(), "chat session closed");
    }
}
