//! Reply resolution: remote endpoint first, local keyword rules as fallback.
//!
//! [`ResponseResolver::resolve`] is total. Every failure of the remote attempt
//! is logged and answered from the [`FallbackClassifier`], so callers always
//! receive a non-empty reply and never an error.

pub mod classifier;
pub mod error;
pub mod remote;

pub use classifier::{Classification, FallbackClassifier, KeywordGroup, KeywordRule};
pub use error::ResolverError;
pub use remote::{ChatbotReply, ChatbotRequest, HttpResponder, RemoteResponder};

use std::fmt;
use std::sync::Arc;

use crate::config::ChatbotConfig;

/// Where a reply came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplySource {
    /// The remote endpoint answered.
    Remote,
    /// The local classifier answered.
    Fallback(Option<KeywordGroup>),
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Fallback(Some(group)) => write!(f, "fallback:{group:?}"),
            Self::Fallback(None) => write!(f, "fallback:generic"),
        }
    }
}

/// Outcome of one resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Reply text, never empty.
    pub text: String,
    /// Origin of the reply.
    pub source: ReplySource,
}

impl Resolution {
    /// Whether the local classifier produced the reply.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, ReplySource::Fallback(_))
    }
}

/// Phases of a single resolution, reported through tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Requesting,
    Succeeded,
    FailedRemote,
    Classifying,
    Resolved,
}

/// Turns visitor text into reply text.
///
/// Stateless apart from the remote client; share it across sessions with `Arc`.
#[derive(Clone)]
pub struct ResponseResolver {
    remote: Arc<dyn RemoteResponder>,
    classifier: FallbackClassifier,
}

impl fmt::Debug for ResponseResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseResolver")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl ResponseResolver {
    /// Resolver over an arbitrary remote responder and the built-in rules.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteResponder>) -> Self {
        Self {
            remote,
            classifier: FallbackClassifier::default(),
        }
    }

    /// Resolver posting to the configured HTTP endpoint.
    ///
    /// # Errors
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ChatbotConfig) -> Result<Self, ResolverError> {
        Ok(Self::new(Arc::new(HttpResponder::new(config)?))
            .with_classifier(FallbackClassifier::for_owner(&config.owner_name)))
    }

    /// Replace the fallback classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: FallbackClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Fallback classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &FallbackClassifier {
        &self.classifier
    }

    /// Resolve a reply for `message`. Never fails.
    ///
    /// The remote endpoint is tried exactly once; no retries.
    pub async fn resolve(&self, message: &str) -> Resolution {
        tracing::debug!(phase = ?Phase::Requesting, "resolving reply");

        match self.remote.respond(message).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(phase = ?Phase::Succeeded, "remote reply received");
                tracing::debug!(phase = ?Phase::Resolved, source = %ReplySource::Remote);
                return Resolution {
                    text,
                    source: ReplySource::Remote,
                };
            }
            Ok(_) => {
                tracing::warn!(phase = ?Phase::FailedRemote, "remote responder returned an empty reply");
            }
            Err(e) if e.endpoint_answered() => {
                tracing::warn!(phase = ?Phase::FailedRemote, "remote reply unusable: {e}");
            }
            Err(e) => {
                tracing::error!(phase = ?Phase::FailedRemote, timeout = e.is_timeout(), "error calling chatbot endpoint: {e}");
            }
        }

        self.fallback(message)
    }

    /// Answer from the local classifier only.
    #[must_use]
    pub fn fallback(&self, message: &str) -> Resolution {
        tracing::debug!(phase = ?Phase::Classifying, "using local fallback classifier");
        let classification = self.classifier.classify(message);
        let source = ReplySource::Fallback(classification.group);
        tracing::debug!(phase = ?Phase::Resolved, %source);
        Resolution {
            text: classification.response,
            source,
        }
    }
}
