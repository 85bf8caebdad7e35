//! Terminal chat surface.
//!
//! Reads visitor lines from stdin, submits them through a chat session and
//! prints the bot replies. Empty lines are ignored; `/quit` exits. Logs go to
//! stderr so they stay out of the transcript.
//! Run with: cargo run --bin portfolio-chat

use std::process::ExitCode;

use portfolio_chatbot::chat::{ChatSurface, Origin, SubmitOutcome};
use portfolio_chatbot::config::ChatbotConfig;
use portfolio_chatbot::resolver::ResponseResolver;
use portfolio_chatbot::start_portfolio_server::init_stderr_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> ExitCode {
    init_stderr_tracing();

    let config = match ChatbotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    let resolver = match ResponseResolver::from_config(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("  Cannot reach {}: {e}", config.endpoint);
            return ExitCode::from(1);
        }
    };

    let chat = ChatSurface::open(resolver, &config);
    let snapshot = chat.snapshot();
    for message in &snapshot.messages {
        println!("bot> {}", message.text());
    }
    for suggestion in &snapshot.suggestions {
        println!("  try: {suggestion}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("  stdin error: {e}");
                return ExitCode::from(1);
            }
        };
        if line.trim() == "/quit" {
            break;
        }

        if let SubmitOutcome::Replied { .. } = chat.submit(&line).await {
            if let Some(reply) = chat
                .snapshot()
                .messages
                .last()
                .filter(|m| m.origin() == Origin::Bot)
            {
                println!("bot> {}", reply.text());
            }
        }
    }

    ExitCode::SUCCESS
}
