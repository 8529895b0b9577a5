//! Wire contracts with the two external collaborators.
//!
//! - `oracle`: the JSON request/response exchanged with the classification
//!   service.
//! - `host`: the capability descriptor the host publishes at startup and the
//!   events we ask it to send on our behalf.

pub mod host;
pub mod oracle;
