//! Strongly typed room event as delivered by the host.
//!
//! Only the fields the gatekeeper reads are modelled explicitly. Everything
//! else (`unsigned`, `state_key`, ...) is kept in `extra` so the event can be
//! handed back to the host without losing data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{GateError, Result};

pub const MESSAGE_TYPE: &str = "m.room.message";
pub const ENCRYPTED_TYPE: &str = "m.room.encrypted";
pub const REDACTION_TYPE: &str = "m.room.redaction";
pub const TEXT_MSGTYPE: &str = "m.text";

/// Event type, collapsed to the cases the gatekeeper distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// `m.room.message`
    Message,
    /// `m.room.encrypted`
    Encrypted,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Message => MESSAGE_TYPE,
            EventType::Encrypted => ENCRYPTED_TYPE,
            EventType::Other(s) => s,
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Other(String::new())
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            MESSAGE_TYPE => EventType::Message,
            ENCRYPTED_TYPE => EventType::Encrypted,
            _ => EventType::Other(s),
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        EventType::from(s.to_string())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Room event (read-only to the gatekeeper except for content scrubbing).
///
/// Decoding never fails on a JSON object: missing, `null` or wrong-typed
/// fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub room_id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub sender: String,
    #[serde(rename = "type", default, deserialize_with = "type_or_empty")]
    pub kind: EventType,
    #[serde(
        default,
        deserialize_with = "u64_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_server_ts: Option<u64>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub content: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Build a bare event. Mostly useful for tests and host adapters.
    pub fn new(
        kind: impl Into<EventType>,
        room_id: impl Into<String>,
        sender: impl Into<String>,
        content: Map<String, Value>,
    ) -> Self {
        Self {
            event_id: None,
            room_id: room_id.into(),
            sender: sender.into(),
            kind: kind.into(),
            origin_server_ts: None,
            content,
            extra: Map::new(),
        }
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Event id, treating an empty string as absent.
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_plain_message(&self) -> bool {
        self.kind == EventType::Message
    }

    /// `content.msgtype`, if it is a string.
    pub fn msgtype(&self) -> Option<&str> {
        self.content.get("msgtype").and_then(Value::as_str)
    }

    /// Blank the visible text of a message: `body` is always set to `""`,
    /// `formatted_body` only when it was present.
    pub fn scrub_text(&mut self) {
        self.content.insert("body".into(), Value::String(String::new()));
        if self.content.contains_key("formatted_body") {
            self.content
                .insert("formatted_body".into(), Value::String(String::new()));
        }
    }

    /// JSON representation handed back to the host.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| GateError::Internal(format!("event encode failed: {e}")))
    }
}

/// Lenient string field: anything but a JSON string decodes as `""`.
pub fn string_or_empty<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_none(de)?.unwrap_or_default())
}

fn string_or_none<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn type_or_empty<'de, D>(de: D) -> std::result::Result<EventType, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_empty(de).map(EventType::from)
}

fn u64_or_none<'de, D>(de: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        Some(Value::Number(n)) => Ok(n.as_u64()),
        _ => Ok(None),
    }
}

// `content: null` or a non-object shows up on malformed events; treat as empty.
fn object_or_empty<'de, D>(de: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        Some(Value::Object(m)) => Ok(m),
        _ => Ok(Map::new()),
    }
}
