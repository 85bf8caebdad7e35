//! HTTP server exposing the chatbot endpoint.
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/chatbot` (`{ "message" }` in, `{ "response"?, "error"? }` out)

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Start the HTTP server with graceful shutdown support.
///
/// The server stops accepting new connections when `shutdown_signal` completes.
///
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server_with_shutdown<F>(
    state: Arc<AppState>,
    port: u16,
    shutdown_signal: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app: Router = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Portfolio chatbot server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::chat::{ChatSurface, SubmitOutcome};
    use crate::config::ChatbotConfig;
    use crate::llm::{LlmError, Persona, ReplyGenerator};
    use crate::resolver::{KeywordGroup, ReplySource, ResponseResolver};

    struct EchoGenerator {
        healthy: bool,
    }

    #[async_trait]
    impl ReplyGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            if !self.healthy {
                return Err(LlmError::EmptyGeneration);
            }
            let question = prompt
                .rsplit("User: ")
                .next()
                .and_then(|rest| rest.strip_suffix("\nAssistant:"))
                .unwrap_or_default();
            Ok(format!("You asked: {question}"))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    async fn chat_against(healthy: bool) -> ChatSurface {
        let state = AppState::new(Arc::new(EchoGenerator { healthy }), Persona::new("Jane Doe"));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });

        let config = ChatbotConfig::new().with_endpoint(format!("http://{addr}/api/chatbot"));
        ChatSurface::open(ResponseResolver::from_config(&config).unwrap(), &config)
    }

    #[tokio::test]
    async fn test_chat_through_live_endpoint() {
        let chat = chat_against(true).await;

        let outcome = chat.submit("  What are his skills?  ").await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Replied {
                source: ReplySource::Remote,
                ..
            }
        ));
        let snapshot = chat.snapshot();
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(
            snapshot.messages[2].text(),
            "You asked: What are his skills?"
        );
    }

    #[tokio::test]
    async fn test_chat_falls_back_when_endpoint_reports_error() {
        let chat = chat_against(false).await;

        let outcome = chat.submit("What are his skills?").await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Replied {
                source: ReplySource::Fallback(Some(KeywordGroup::Skills)),
                ..
            }
        ));
        assert!(!chat.snapshot().messages[2].text().contains("LLM error"));
    }
}
