//! Enforcement: the per-event state machine and the redaction side channel.

pub mod engine;
pub mod redaction;

pub use engine::{AllowDecision, Gatekeeper};
pub use redaction::{RedactionDispatcher, REDACTION_REASON};
