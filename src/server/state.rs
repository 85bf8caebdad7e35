//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::llm::{Persona, ReplyGenerator};

/// Shared application state.
pub struct AppState {
    /// Backend generating replies.
    pub generator: Arc<dyn ReplyGenerator>,
    /// Persona prompt wrapped around visitor messages.
    pub persona: Persona,
}

impl AppState {
    /// State over an arbitrary generator.
    #[must_use]
    pub fn new(generator: Arc<dyn ReplyGenerator>, persona: Persona) -> Arc<Self> {
        Arc::new(Self { generator, persona })
    }
}
