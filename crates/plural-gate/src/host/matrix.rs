//! Homeserver adapter: sends events as the bot through the client-server API
//! using the application-service token and `user_id` assertion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use plural_gate_core::error::{GateError, Result};
use plural_gate_core::protocol::host::{CapabilityDescriptor, OutboundEvent};

use crate::config::HostSection;

use super::HostApi;

const HOST_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MatrixHost {
    http: reqwest::Client,
    homeserver: Url,
    as_token: String,
    descriptor: CapabilityDescriptor,
    txn_prefix: String,
    txn_seq: AtomicU64,
}

impl MatrixHost {
    pub fn new(section: &HostSection) -> Result<Self> {
        let homeserver = Url::parse(&section.homeserver_url)
            .map_err(|e| GateError::BadRequest(format!("invalid homeserver url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(HOST_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GateError::Internal(format!("host http client build failed: {e}")))?;
        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        Ok(Self {
            http,
            homeserver,
            as_token: section.as_token.clone(),
            descriptor: section.descriptor(),
            txn_prefix: format!("plural-gate-{started}"),
            txn_seq: AtomicU64::new(0),
        })
    }

    fn next_txn_id(&self) -> String {
        let n = self.txn_seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.txn_prefix, n)
    }

    /// `/rooms/{room}/redact/{event}/{txn}` for redactions,
    /// `/rooms/{room}/send/{type}/{txn}` otherwise.
    pub fn event_url(&self, event: &OutboundEvent, txn_id: &str) -> Result<Url> {
        let mut url = self.homeserver.clone();
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| GateError::BadRequest("homeserver url cannot be a base".into()))?;
            segs.pop_if_empty()
                .extend(["_matrix", "client", "v3", "rooms", event.room_id.as_str()]);
            match (&event.redacts, event.is_redaction()) {
                (Some(target), true) => segs.extend(["redact", target.as_str(), txn_id]),
                _ => segs.extend(["send", event.event_type.as_str(), txn_id]),
            };
        }
        url.query_pairs_mut().append_pair("user_id", &event.sender);
        Ok(url)
    }
}

#[async_trait]
impl HostApi for MatrixHost {
    fn capabilities(&self) -> Result<CapabilityDescriptor> {
        Ok(self.descriptor.clone())
    }

    async fn send_event(&self, event: OutboundEvent) -> Result<()> {
        let url = self.event_url(&event, &self.next_txn_id())?;

        let mut body = event.content.clone();
        if event.is_redaction() {
            // The redact endpoint takes the target from the path.
            body.remove("redacts");
        }

        let resp = self
            .http
            .put(url)
            .bearer_auth(&self.as_token)
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|e| GateError::Host(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(GateError::Host(format!("status {status}: {detail}")));
        }
        Ok(())
    }
}
