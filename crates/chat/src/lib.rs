//! `ewaste-chat`: contextual follow-up answers.
//!
//! Single-turn and stateless: the client sends the last classification with
//! every message, and the reply is a pure function of the message, that
//! context and the disposal knowledge base.

pub mod context;
pub mod intent;
pub mod responder;

pub use context::ChatContext;
pub use intent::{Intent, Pattern, RULES, Rule, detect_intent};
pub use responder::{ChatResponder, Reply};
