//! Async chat surface: one session, a shared resolver and a snapshot feed.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use super::ids::{MessageId, SessionId};
use super::message::Message;
use super::session::{ConversationSession, PendingReply, SubmitRejection};
use crate::config::ChatbotConfig;
use crate::resolver::{ReplySource, ResponseResolver};

/// What a renderer needs to draw the chat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Log, oldest first.
    pub messages: Vec<Message>,
    /// Whether a reply is being resolved.
    pub pending: bool,
    /// Unsent input.
    pub draft: String,
    /// Quick prompts to offer.
    pub suggestions: Vec<String>,
}

impl SessionSnapshot {
    fn of(session: &ConversationSession) -> Self {
        Self {
            messages: session.messages().to_vec(),
            pending: session.is_pending(),
            draft: session.draft().to_string(),
            suggestions: session.suggestions(),
        }
    }
}

/// Result of a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply was appended.
    Replied {
        /// Identifier of the bot message.
        message_id: MessageId,
        /// Origin of the reply.
        source: ReplySource,
    },
    /// Nothing happened.
    Ignored(SubmitRejection),
}

struct Inner {
    id: SessionId,
    session: Mutex<ConversationSession>,
    resolver: ResponseResolver,
    updates: watch::Sender<SessionSnapshot>,
}

impl Inner {
    fn publish(&self, session: &ConversationSession) {
        self.updates.send_replace(SessionSnapshot::of(session));
    }

    async fn resolve_and_complete(&self, pending: PendingReply) -> SubmitOutcome {
        let resolution = self.resolver.resolve(pending.prompt()).await;

        let mut session = self.session.lock().await;
        match session.complete(pending, &resolution.text) {
            Ok(message_id) => {
                self.publish(&session);
                tracing::info!(session_id = %self.id, %message_id, source = %resolution.source, "reply delivered");
                SubmitOutcome::Replied {
                    message_id,
                    source: resolution.source,
                }
            }
            Err(e) => {
                // Tokens never leave this surface, so this is a logic error.
                tracing::error!(session_id = %self.id, "reply dropped: {e}");
                SubmitOutcome::Ignored(SubmitRejection::Pending)
            }
        }
    }

    /// Clear `pending` with a local reply after the reply task died.
    async fn recover(&self, prompt: &str) -> SubmitOutcome {
        let resolution = self.resolver.fallback(prompt);
        let mut session = self.session.lock().await;
        let Some(message_id) = session.abandon(&resolution.text) else {
            return SubmitOutcome::Ignored(SubmitRejection::Pending);
        };
        self.publish(&session);
        SubmitOutcome::Replied {
            message_id,
            source: resolution.source,
        }
    }
}

/// Cloneable handle over one open chat.
///
/// The session lock is only held for the synchronous state transitions,
/// never across the resolver call. The resolver call and the completion run
/// on a spawned task, so dropping a `submit` future does not leave the
/// session pending.
#[derive(Clone)]
pub struct ChatSurface {
    inner: Arc<Inner>,
    id: SessionId,
}

impl ChatSurface {
    /// Open a chat backed by `resolver`.
    #[must_use]
    pub fn open(resolver: ResponseResolver, config: &ChatbotConfig) -> Self {
        let session = ConversationSession::for_owner(&config.owner_name, config.greeting.clone());
        let id = session.id();
        let (updates, _) = watch::channel(SessionSnapshot::of(&session));
        tracing::info!(session_id = %id, "chat surface opened");

        Self {
            inner: Arc::new(Inner {
                id,
                session: Mutex::new(session),
                resolver,
                updates,
            }),
            id,
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Receive a snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.updates.borrow().clone()
    }

    /// Replace the unsent input.
    pub async fn set_draft(&self, text: impl Into<String>) {
        let mut session = self.inner.session.lock().await;
        session.set_draft(text);
        self.publish(&session);
    }

    /// Submit the current draft.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let draft = self.inner.session.lock().await.draft().to_string();
        self.submit(&draft).await
    }

    /// Submit `text` and wait for the reply to be appended.
    ///
    /// Blank text and submissions made while a reply is pending are ignored.
    /// Cancelling the returned future does not cancel the reply: it is still
    /// appended and `pending` is still cleared.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let pending = {
            let mut session = self.inner.session.lock().await;
            match session.begin_submit(text) {
                Ok(pending) => {
                    self.publish(&session);
                    pending
                }
                Err(rejection) => return SubmitOutcome::Ignored(rejection),
            }
        };

        let prompt = pending.prompt().to_string();
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.resolve_and_complete(pending).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session_id = %self.id, "reply task failed: {e}");
                self.inner.recover(&prompt).await
            }
        }
    }

    /// Fire-and-forget [`submit`](Self::submit) on the current tokio runtime.
    pub fn submit_detached(&self, text: impl Into<String>) -> JoinHandle<SubmitOutcome> {
        let surface = self.clone();
        let text = text.into();
        tokio::spawn(async move { surface.submit(&text).await })
    }

    fn publish(&self, session: &ConversationSession) {
        self.inner.publish(session);
    }
}
