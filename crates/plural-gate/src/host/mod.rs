//! Host abstraction.
//!
//! The host is whatever delivers events to us and can send events on the
//! bot's behalf (in production, a homeserver reached through its
//! client-server API). It publishes a versioned capability descriptor once at
//! startup; the enforcement mode is derived from it and never re-evaluated.

pub mod capability;
pub mod matrix;

use async_trait::async_trait;

use plural_gate_core::error::Result;
use plural_gate_core::protocol::host::{CapabilityDescriptor, OutboundEvent};

pub use capability::{detect_mode, EnforcementMode};
pub use matrix::MatrixHost;

#[async_trait]
pub trait HostApi: Send + Sync {
    /// Versioned list of hooks the host can call.
    fn capabilities(&self) -> Result<CapabilityDescriptor>;

    /// Create and send an event into a room.
    async fn send_event(&self, event: OutboundEvent) -> Result<()>;
}
