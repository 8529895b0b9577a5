//! Payload normalizer: event -> oracle request.
//!
//! `None` means "not a candidate": the caller treats the event as not proxied
//! and must not contact the oracle.

use crate::event::{Event, EventType, TEXT_MSGTYPE};
use crate::protocol::oracle::{ClassificationRequest, RequestPayload};

/// Sender prefix used for the proxy's managed (ghost) users.
pub const DEFAULT_PROXY_PREFIX: &str = "@_plural_";

/// The bot's own user id plus the prefix of the users it manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    bot_id: String,
    proxy_prefix: String,
}

impl BotIdentity {
    pub fn new(bot_id: impl Into<String>, proxy_prefix: impl Into<String>) -> Self {
        Self {
            bot_id: bot_id.into(),
            proxy_prefix: proxy_prefix.into(),
        }
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    pub fn is_bot(&self, user_id: &str) -> bool {
        user_id == self.bot_id
    }

    /// True for the bot itself and for any proxy-originated sender.
    pub fn owns(&self, sender: &str) -> bool {
        self.is_bot(sender)
            || (!self.proxy_prefix.is_empty() && sender.starts_with(&self.proxy_prefix))
    }
}

pub fn normalize(event: &Event, bot: &BotIdentity) -> Option<ClassificationRequest> {
    let payload = match event.kind {
        EventType::Message => {
            if event.msgtype() != Some(TEXT_MSGTYPE) {
                return None;
            }
            RequestPayload::Content(event.content.clone())
        }
        // Opaque; the oracle decides what it can do with ciphertext.
        EventType::Encrypted => RequestPayload::EncryptedPayload(event.content.clone()),
        EventType::Other(_) => return None,
    };

    if bot.owns(&event.sender) {
        return None;
    }

    Some(ClassificationRequest {
        sender: event.sender.clone(),
        room_id: event.room_id.clone(),
        event_type: event.kind.as_str().to_string(),
        event_id: event.event_id().map(str::to_string),
        origin_server_ts: event.origin_server_ts,
        bot_id: bot.bot_id().to_string(),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_is_literal() {
        let bot = BotIdentity::new("@plural_bot:localhost", DEFAULT_PROXY_PREFIX);
        assert!(bot.owns("@plural_bot:localhost"));
        assert!(bot.owns("@_plural_sys_alice:localhost"));
        assert!(!bot.owns("@plural_bot2:localhost"));
        assert!(!bot.owns("@alice:localhost"));
    }

    #[test]
    fn empty_prefix_only_matches_bot() {
        let bot = BotIdentity::new("@bot:x", "");
        assert!(!bot.owns("@alice:x"));
        assert!(bot.owns("@bot:x"));
    }
}
