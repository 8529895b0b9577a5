//! plural-gate core: event model, wire contracts, and the oracle payload
//! normalizer.
//!
//! This crate carries no runtime, transport, or HTTP dependencies. It defines
//! the strongly typed event the host hands us, the JSON shapes exchanged with
//! the classification oracle and the host, and the pure projection from one
//! to the other.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed events
//! degrade to empty/unset fields instead of failing, so nothing in this crate
//! can take down the host's event pipeline.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod event;
pub mod normalize;
pub mod protocol;

/// Shared result type.
pub use error::{GateError, Result};
pub use event::{Event, EventType};
pub use normalize::{normalize, BotIdentity};
