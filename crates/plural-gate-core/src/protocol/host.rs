//! Host capability descriptor and outbound events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::REDACTION_TYPE;

/// Descriptor versions this build understands.
pub const SUPPORTED_HOST_API_VERSIONS: &[u32] = &[1];

/// Extension points a host may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    /// Pre-persist check; may rewrite the event.
    CheckEventAllowed,
    /// Per-viewer visibility filter.
    CheckVisibilityCanSeeEvent,
    /// Post-broadcast notification.
    OnNewEvent,
}

/// Versioned list of hooks the host is able to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub api_version: u32,
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

impl CapabilityDescriptor {
    pub fn is_supported_version(&self) -> bool {
        SUPPORTED_HOST_API_VERSIONS.contains(&self.api_version)
    }

    pub fn offers(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }
}

/// Event the host should create and send into a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEvent {
    pub room_id: String,
    pub sender: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redacts: Option<String>,
    pub content: Map<String, Value>,
}

impl OutboundEvent {
    /// `m.room.redaction` targeting `event_id`.
    pub fn redaction(
        room_id: impl Into<String>,
        sender: impl Into<String>,
        event_id: impl Into<String>,
        reason: &str,
    ) -> Self {
        let event_id = event_id.into();
        let mut content = Map::new();
        content.insert("reason".into(), Value::String(reason.to_string()));
        // Room versions >= 11 read the target from content.
        content.insert("redacts".into(), Value::String(event_id.clone()));
        Self {
            room_id: room_id.into(),
            sender: sender.into(),
            event_type: REDACTION_TYPE.to_string(),
            redacts: Some(event_id),
            content,
        }
    }

    pub fn is_redaction(&self) -> bool {
        self.event_type == REDACTION_TYPE
    }

    pub fn reason(&self) -> Option<&str> {
        self.content.get("reason").and_then(Value::as_str)
    }
}
