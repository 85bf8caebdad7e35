//! Chat sessions for the portfolio chatbot widget.
//!
//! - [`session`]: the message log and its single-flight submission guard
//! - [`surface`]: async handle that runs the resolver and publishes snapshots

pub mod ids;
pub mod message;
pub mod session;
pub mod surface;

pub use ids::{MessageId, SessionId};
pub use message::{Message, Origin};
pub use session::{ConversationSession, ForeignReply, PendingReply, SubmitRejection};
pub use surface::{ChatSurface, SessionSnapshot, SubmitOutcome};
