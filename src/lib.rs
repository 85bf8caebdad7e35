//! Chatbot core for a personal portfolio website.
//!
//! A chat widget submits visitor text to a [`chat::ConversationSession`];
//! replies come from a [`resolver::ResponseResolver`] that asks the remote
//! chatbot endpoint first and answers from local keyword rules when it
//! cannot. The endpoint itself lives in [`server`], backed by an Ollama model.

// Strict baseline
#![deny(warnings)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(dead_code)]
#![deny(non_camel_case_types)]
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)]
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]
// Clippy discipline
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]
// Robustness
#![deny(overflowing_literals)]
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::shadow_unrelated,
        clippy::too_many_lines
    )
)]

/// Chat sessions, messages and the async chat surface.
#[allow(clippy::significant_drop_tightening)]
pub mod chat;
/// Client and server configuration.
pub mod config;
/// LLM backend for the chatbot endpoint.
#[allow(clippy::doc_markdown)]
pub mod llm;
/// Reply resolution with local fallback.
pub mod resolver;
/// HTTP server exposing `/api/chatbot`.
#[allow(
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::unused_async
)]
pub mod server;
/// Entry helpers for the server binary.
pub mod start_portfolio_server;
