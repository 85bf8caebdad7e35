//! Chatbot endpoint server.
//! Run with: cargo run --bin portfolio-chat-server

use std::process::ExitCode;

use portfolio_chatbot::start_portfolio_server;

fn main() -> ExitCode {
    start_portfolio_server::run()
}
