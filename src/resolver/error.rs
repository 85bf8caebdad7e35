//! Error types for remote reply resolution.
//!
//! None of these reach the visitor: the resolver logs them and answers from
//! the fallback classifier instead.

use thiserror::Error;

/// Failures of a remote resolution attempt.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Transport-level failure, including timeouts.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Endpoint is not a valid absolute URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Endpoint answered with a non-success status.
    #[error("Endpoint returned status {0}")]
    Status(u16),

    /// Body was not `{ response?: string, error?: string }`.
    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Body parsed but carried no usable reply.
    #[error("No reply in response{}", diagnostic_suffix(.diagnostic.as_deref()))]
    MissingReply {
        /// Server-supplied `error` field, if any.
        diagnostic: Option<String>,
    },
}

impl ResolverError {
    /// Whether the endpoint was reached and answered.
    #[must_use]
    pub const fn endpoint_answered(&self) -> bool {
        matches!(
            self,
            Self::Status(_) | Self::MalformedBody(_) | Self::MissingReply { .. }
        )
    }

    /// Whether the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::HttpRequest(e) if e.is_timeout())
    }
}

fn diagnostic_suffix(diagnostic: Option<&str>) -> String {
    diagnostic
        .map(|d| format!(" (server said: {d})"))
        .unwrap_or_default()
}
