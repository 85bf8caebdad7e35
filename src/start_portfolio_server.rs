//! Startup helpers for the portfolio chatbot server.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

use crate::config::ServerConfig;
use crate::llm::{OllamaClient, Persona};
use crate::server::{self, AppState};

/// Log subscriber writing formatted events to `writer`.
///
/// `RUST_LOG` aware, `info` by default.
#[must_use]
pub fn subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .finish()
}

/// Install the global tracing subscriber on stdout.
pub fn init_tracing() {
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber(std::io::stdout));
}

/// Install the global tracing subscriber on stderr, keeping stdout for the
/// chat transcript.
pub fn init_stderr_tracing() {
    let _ = tracing::subscriber::set_global_default(subscriber(std::io::stderr));
}

/// Run the server until ctrl-c (used by the `portfolio-chat-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();
    tracing::info!("Starting portfolio chatbot v{}", env!("CARGO_PKG_VERSION"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    match rt.block_on(serve(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ollama = OllamaClient::new(&config)?;
    tracing::info!("Ollama endpoint: {}", ollama.base_url());
    if !ollama.is_ready().await {
        // Requests will fail with 502 and the widget answers from its local rules.
        tracing::warn!("Ollama is not reachable yet; serving anyway");
    }

    let state = AppState::new(Arc::new(ollama), Persona::from_config(&config));
    server::run_server_with_shutdown(state, config.port, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
