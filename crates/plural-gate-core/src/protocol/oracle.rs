//! Classification oracle request/response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Verdict string that marks an event as an injected proxy message.
pub const BLOCK_ACTION: &str = "BLOCK";

/// Normalized projection of an event sent to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRequest {
    pub sender: String,
    pub room_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_server_ts: Option<u64>,
    pub bot_id: String,
    #[serde(flatten)]
    pub payload: RequestPayload,
}

/// Plaintext content or the opaque encrypted content, serialized under
/// `content` / `encrypted_payload` respectively.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPayload {
    Content(Map<String, Value>),
    EncryptedPayload(Map<String, Value>),
}

/// Oracle response. Only `action` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleVerdict {
    #[serde(default)]
    pub action: Option<Value>,
}

impl OracleVerdict {
    pub fn is_block(&self) -> bool {
        matches!(&self.action, Some(Value::String(a)) if a == BLOCK_ACTION)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn verdict_only_blocks_on_exact_action() {
        let v: OracleVerdict = serde_json::from_value(json!({"action": "BLOCK"})).unwrap();
        assert!(v.is_block());

        let others = [
            json!({"action": "ALLOW"}),
            json!({"action": "block"}),
            json!({"action": 1}),
            json!({}),
        ];
        for other in others {
            let v: OracleVerdict = serde_json::from_value(other).unwrap();
            assert!(!v.is_block());
        }
    }

    #[test]
    fn optional_fields_are_omitted() {
        let req = ClassificationRequest {
            sender: "@alice:example.org".into(),
            room_id: "!r:example.org".into(),
            event_type: "m.room.message".into(),
            event_id: None,
            origin_server_ts: None,
            bot_id: "@plural_bot:localhost".into(),
            payload: RequestPayload::Content(Map::new()),
        };
        let v = serde_json::to_value(&req).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("event_id"));
        assert!(!obj.contains_key("origin_server_ts"));
        assert_eq!(obj["content"], json!({}));
        assert_eq!(obj["type"], "m.room.message");
    }
}
