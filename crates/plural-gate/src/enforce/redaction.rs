//! Fire-and-forget redaction of proxied originals.

use std::sync::Arc;

use tokio::task::JoinHandle;

use plural_gate_core::protocol::host::OutboundEvent;

use crate::host::HostApi;
use crate::obs::GateMetrics;

pub const REDACTION_REASON: &str = "Proxied message replaced by its plural proxy copy";

pub struct RedactionDispatcher {
    host: Arc<dyn HostApi>,
    bot_id: String,
    metrics: Arc<GateMetrics>,
}

impl RedactionDispatcher {
    pub fn new(
        host: Arc<dyn HostApi>,
        bot_id: impl Into<String>,
        metrics: Arc<GateMetrics>,
    ) -> Self {
        Self {
            host,
            bot_id: bot_id.into(),
            metrics,
        }
    }

    /// Spawn a detached redaction of `event_id` as the bot. Errors are logged
    /// and dropped; there is no retry. Returns `None` when nothing was
    /// dispatched (missing ids, or no runtime to spawn on).
    pub fn redact(&self, room_id: &str, event_id: Option<&str>) -> Option<JoinHandle<()>> {
        let event_id = match event_id {
            Some(id) if !id.is_empty() && !room_id.is_empty() => id,
            _ => {
                self.metrics.redactions.inc(&[("outcome", "skipped")]);
                return None;
            }
        };

        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(room_id, event_id, "no runtime available; redaction skipped");
            self.metrics.redactions.inc(&[("outcome", "skipped")]);
            return None;
        };

        let ev =
            OutboundEvent::redaction(room_id, self.bot_id.as_str(), event_id, REDACTION_REASON);
        let host = Arc::clone(&self.host);
        let metrics = Arc::clone(&self.metrics);

        Some(rt.spawn(async move {
            let room_id = ev.room_id.clone();
            let target = ev.redacts.clone().unwrap_or_default();
            match host.send_event(ev).await {
                Ok(()) => {
                    metrics.redactions.inc(&[("outcome", "sent")]);
                    tracing::info!(%room_id, event_id = %target, "proxied original redacted");
                }
                Err(e) => {
                    metrics.redactions.inc(&[("outcome", "failed")]);
                    tracing::warn!(
                        error = %e,
                        %room_id,
                        event_id = %target,
                        "redaction failed; dropped"
                    );
                }
            }
        }))
    }
}
