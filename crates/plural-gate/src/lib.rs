//! plural-gate runtime library.
//!
//! Wires the oracle client, decision cache, capability detection, and the
//! enforcement engine together, and exposes them to a homeserver module shim
//! over a small local HTTP surface. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod classify;
pub mod config;
pub mod enforce;
pub mod hooks;
pub mod host;
pub mod obs;
pub mod ops;
pub mod router;
