//! Remote reply lookup over HTTP.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ChatbotConfig;

use super::error::ResolverError;

/// Request body sent to the chatbot endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotRequest {
    /// Raw visitor text.
    pub message: String,
}

/// Response body of the chatbot endpoint.
///
/// Both fields are optional and independent: `error` is diagnostic only and
/// does not by itself mean the request failed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotReply {
    /// Reply text, possibly markdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Diagnostic message from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatbotReply {
    /// Successful reply.
    #[must_use]
    pub fn response(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            error: None,
        }
    }

    /// Diagnostic-only reply.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(message.into()),
        }
    }

    /// Extract the usable reply, or explain why there is none.
    ///
    /// # Errors
    /// Returns [`ResolverError::MissingReply`] when `response` is absent or blank.
    pub fn into_reply(self) -> Result<String, ResolverError> {
        match self.response {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ResolverError::MissingReply {
                diagnostic: self.error,
            }),
        }
    }
}

/// Source of remote replies.
#[async_trait]
pub trait RemoteResponder: Send + Sync {
    /// Ask the remote side for a reply to `message`.
    ///
    /// # Errors
    /// Returns an error on any transport, status or payload failure.
    async fn respond(&self, message: &str) -> Result<String, ResolverError>;
}

/// [`RemoteResponder`] posting JSON to the chatbot endpoint.
#[derive(Clone, Debug)]
pub struct HttpResponder {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpResponder {
    /// Build a responder from the client configuration.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn new(config: &ChatbotConfig) -> Result<Self, ResolverError> {
        let endpoint = Url::parse(&config.endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()
            .map_err(|e| ResolverError::HttpClient(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    /// Endpoint this responder posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteResponder for HttpResponder {
    async fn respond(&self, message: &str) -> Result<String, ResolverError> {
        let request = ChatbotRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let reply: ChatbotReply = serde_json::from_slice(&body)?;
        if let Some(diagnostic) = &reply.error {
            tracing::warn!(endpoint = %self.endpoint, "chatbot endpoint reported: {diagnostic}");
        }
        reply.into_reply()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    async fn spawn_stub(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn responder_for(addr: SocketAddr) -> HttpResponder {
        let config = ChatbotConfig::new()
            .with_endpoint(format!("http://{addr}/api/chatbot"))
            .with_timeout(Duration::from_secs(5));
        HttpResponder::new(&config).unwrap()
    }

    #[test]
    fn test_reply_parsing() {
        let reply: ChatbotReply = serde_json::from_str(r#"{"response":"Custom reply"}"#).unwrap();
        assert_eq!(reply.into_reply().unwrap(), "Custom reply");

        let reply: ChatbotReply = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            reply.into_reply(),
            Err(ResolverError::MissingReply { diagnostic: None })
        ));

        let reply = ChatbotReply {
            response: Some("   ".to_string()),
            error: Some("empty generation".to_string()),
        };
        match reply.into_reply() {
            Err(ResolverError::MissingReply { diagnostic }) => {
                assert_eq!(diagnostic.as_deref(), Some("empty generation"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_reply_serialization_skips_absent_fields() {
        let json = serde_json::to_string(&ChatbotReply::error("model unavailable")).unwrap();
        assert_eq!(json, r#"{"error":"model unavailable"}"#);
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let config = ChatbotConfig::new().with_endpoint("not a url");
        assert!(matches!(
            HttpResponder::new(&config),
            Err(ResolverError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_success_returns_response_verbatim() {
        let router = Router::new().route(
            "/api/chatbot",
            post(|Json(req): Json<ChatbotRequest>| async move {
                Json(ChatbotReply::response(format!("**echo:** {}", req.message)))
            }),
        );
        let addr = spawn_stub(router).await;

        let reply = responder_for(addr).respond("hi there").await.unwrap();
        assert_eq!(reply, "**echo:** hi there");
    }

    #[tokio::test]
    async fn test_error_field_without_response_fails() {
        let router = Router::new().route(
            "/api/chatbot",
            post(|| async { Json(ChatbotReply::error("model unavailable")) }),
        );
        let addr = spawn_stub(router).await;

        let err = responder_for(addr).respond("hello").await.unwrap_err();
        assert!(matches!(
            err,
            ResolverError::MissingReply { diagnostic: Some(ref d) } if d == "model unavailable"
        ));
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let router = Router::new().route(
            "/api/chatbot",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ChatbotReply::response("ignored")),
                )
                    .into_response()
            }),
        );
        let addr = spawn_stub(router).await;

        let err = responder_for(addr).respond("hello").await.unwrap_err();
        assert!(matches!(err, ResolverError::Status(500)));
    }

    #[tokio::test]
    async fn test_malformed_body_fails() {
        let router = Router::new().route("/api/chatbot", post(|| async { "<html>oops</html>" }));
        let addr = spawn_stub(router).await;

        let err = responder_for(addr).respond("hello").await.unwrap_err();
        assert!(matches!(err, ResolverError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_wrong_field_type_fails() {
        let router = Router::new().route(
            "/api/chatbot",
            post(|| async { Json(serde_json::json!({ "response": 42 })) }),
        );
        let addr = spawn_stub(router).await;

        let err = responder_for(addr).respond("hello").await.unwrap_err();
        assert!(matches!(err, ResolverError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let router = Router::new().route(
            "/api/chatbot",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(ChatbotReply::response("too late"))
            }),
        );
        let addr = spawn_stub(router).await;
        let config = ChatbotConfig::new()
            .with_endpoint(format!("http://{addr}/api/chatbot"))
            .with_timeout(Duration::from_millis(200));

        let err = HttpResponder::new(&config)
            .unwrap()
            .respond("hello")
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "unexpected: {err:?}");
        assert!(!err.endpoint_answered());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = responder_for(addr).respond("hello").await.unwrap_err();
        assert!(matches!(err, ResolverError::HttpRequest(_)));
        assert!(!err.endpoint_answered());
    }
}
