//! Gatekeeper engine.
//!
//! Three entry points, one per host hook. Each returns a definite answer and
//! never blocks delivery: classification problems degrade to "not proxied",
//! redaction problems are dropped.
//!
//! | hook                             | applies to     | when proxied               |
//! |----------------------------------|----------------|----------------------------|
//! | `check_event_allowed`            | plain messages | FallbackClear: blank text  |
//! | `check_visibility_can_see_event` | + encrypted    | Blackhole: sender/bot only |
//! | `on_new_event`                   | plain messages | redaction (any mode)       |

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use plural_gate_core::protocol::host::Hook;
use plural_gate_core::{normalize, BotIdentity, Event};

use crate::classify::{Classifier, DecisionCache};
use crate::host::{detect_mode, EnforcementMode, HostApi};
use crate::obs::GateMetrics;

use super::redaction::RedactionDispatcher;

/// Result of the broadcast-mutation check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowDecision {
    /// Always true: the gatekeeper never drops an event.
    pub allowed: bool,
    /// Replacement event for the host to persist. `None` keeps the original.
    pub event: Option<Value>,
}

impl AllowDecision {
    /// Allow without touching the event.
    pub fn keep_original() -> Self {
        Self { allowed: true, event: None }
    }

    fn replace_with(event: Value) -> Self {
        Self { allowed: true, event: Some(event) }
    }
}

pub struct Gatekeeper {
    mode: EnforcementMode,
    bot: BotIdentity,
    cache: DecisionCache,
    classifier: Arc<dyn Classifier>,
    redactor: RedactionDispatcher,
    metrics: Arc<GateMetrics>,
}

impl Gatekeeper {
    pub fn new(
        mode: EnforcementMode,
        bot: BotIdentity,
        classifier: Arc<dyn Classifier>,
        host: Arc<dyn HostApi>,
        metrics: Arc<GateMetrics>,
    ) -> Self {
        let redactor = RedactionDispatcher::new(host, bot.bot_id(), Arc::clone(&metrics));
        Self {
            mode,
            bot,
            cache: DecisionCache::new(),
            classifier,
            redactor,
            metrics,
        }
    }

    /// Build with the mode detected from the host's capability descriptor.
    pub fn detect(
        bot: BotIdentity,
        classifier: Arc<dyn Classifier>,
        host: Arc<dyn HostApi>,
        metrics: Arc<GateMetrics>,
    ) -> Self {
        let mode = detect_mode(host.as_ref());
        Self::new(mode, bot, classifier, host, metrics)
    }

    pub fn mode(&self) -> EnforcementMode {
        self.mode
    }

    pub fn bot(&self) -> &BotIdentity {
        &self.bot
    }

    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    /// Hooks the host should register with us.
    pub fn registered_hooks(&self) -> Vec<Hook> {
        self.mode.required_hooks()
    }

    /// Cache first, then the oracle. Every result for an event with an id is
    /// memoized, fail-open ones included, so one event reaches the oracle once.
    pub async fn is_proxied(&self, event: &Event) -> bool {
        let Some(req) = normalize(event, &self.bot) else {
            return false;
        };
        let event_id = event.event_id();

        if let Some(hit) = self.cache.lookup(&event.room_id, event_id) {
            self.metrics
                .classifications
                .inc(&[("source", "cache"), ("verdict", if hit { "block" } else { "allow" })]);
            return hit;
        }

        let verdict = self.classifier.verdict(&req).await;
        self.metrics
            .classifications
            .inc(&[("source", "oracle"), ("verdict", verdict.as_str())]);

        let is_proxy = verdict.is_proxy();
        if self.cache.store(&event.room_id, event_id, is_proxy) {
            self.metrics.cache_clears.inc(&[]);
            tracing::debug!("decision cache full; cleared");
        }
        is_proxy
    }

    /// Broadcast-mutation check, called before the event is persisted.
    pub async fn check_event_allowed(&self, event: &Event) -> AllowDecision {
        if !event.is_plain_message() {
            return AllowDecision::keep_original();
        }

        let is_proxy = self.is_proxied(event).await;

        let scrub = is_proxy && self.mode == EnforcementMode::FallbackClear;
        let out = if scrub {
            let mut scrubbed = event.clone();
            scrubbed.scrub_text();
            tracing::info!(
                room_id = %event.room_id,
                event_id = event.event_id().unwrap_or(""),
                sender = %event.sender,
                "proxy matched; blanking body"
            );
            scrubbed.to_value()
        } else {
            event.to_value()
        };

        let action = if scrub { "scrub" } else { "pass" };
        self.metrics
            .hook_decisions
            .inc(&[("hook", "check_event_allowed"), ("action", action)]);

        match out {
            Ok(v) => AllowDecision::replace_with(v),
            Err(e) => {
                tracing::error!(error = %e, "event encode failed; keeping original");
                match event.to_value() {
                    Ok(v) => AllowDecision::replace_with(v),
                    Err(_) => AllowDecision::keep_original(),
                }
            }
        }
    }

    /// Per-viewer visibility. Only meaningful in Blackhole mode; otherwise
    /// the host never registers this hook and everything is visible.
    pub async fn check_visibility_can_see_event(&self, viewer: &str, event: &Event) -> bool {
        if self.mode != EnforcementMode::Blackhole {
            return true;
        }
        // Sender and bot always see the event.
        if viewer == event.sender || self.bot.is_bot(viewer) {
            return true;
        }

        let visible = !self.is_proxied(event).await;
        let action = if visible { "show" } else { "hide" };
        self.metrics
            .hook_decisions
            .inc(&[("hook", "check_visibility_can_see_event"), ("action", action)]);
        visible
    }

    /// Post-broadcast hook: redact proxied originals, best effort.
    pub async fn on_new_event(&self, event: &Event) {
        if !event.is_plain_message() {
            return;
        }
        if self.is_proxied(event).await {
            self.redactor.redact(&event.room_id, event.event_id());
        }
    }
}
