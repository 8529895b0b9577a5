//! Test doubles shared by the integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use plural_gate::classify::{Classifier, Verdict};
use plural_gate::enforce::Gatekeeper;
use plural_gate::host::{EnforcementMode, HostApi};
use plural_gate::obs::GateMetrics;
use plural_gate_core::error::{GateError, Result};
use plural_gate_core::protocol::host::{CapabilityDescriptor, Hook, OutboundEvent};
use plural_gate_core::protocol::oracle::ClassificationRequest;
use plural_gate_core::{BotIdentity, Event};

pub const BOT: &str = "@plural_bot:localhost";
pub const ALICE: &str = "@alice:example.org";
pub const BOB: &str = "@bob:example.org";
pub const ROOM: &str = "!room:example.org";

/// Oracle double answering with a settable verdict and counting calls.
pub struct ScriptedOracle {
    verdict: Mutex<Verdict>,
    calls: AtomicUsize,
    last: Mutex<Option<ClassificationRequest>>,
}

impl ScriptedOracle {
    pub fn new(verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            verdict: Mutex::new(verdict),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn set(&self, verdict: Verdict) {
        *self.verdict.lock().unwrap() = verdict;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ClassificationRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for ScriptedOracle {
    async fn verdict(&self, req: &ClassificationRequest) -> Verdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(req.clone());
        *self.verdict.lock().unwrap()
    }
}

/// Host double: fixed descriptor (or failure) and a log of sent events.
pub struct RecordingHost {
    descriptor: Option<CapabilityDescriptor>,
    fail_sends: bool,
    sent: Mutex<Vec<OutboundEvent>>,
}

impl RecordingHost {
    pub fn with_hooks(hooks: Vec<Hook>) -> Arc<Self> {
        Arc::new(Self {
            descriptor: Some(CapabilityDescriptor { api_version: 1, hooks }),
            fail_sends: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn for_mode(mode: EnforcementMode) -> Arc<Self> {
        Self::with_hooks(mode.required_hooks())
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            descriptor: None,
            fail_sends: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<OutboundEvent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostApi for RecordingHost {
    fn capabilities(&self) -> Result<CapabilityDescriptor> {
        self.descriptor
            .clone()
            .ok_or_else(|| GateError::Host("descriptor unavailable".into()))
    }

    async fn send_event(&self, event: OutboundEvent) -> Result<()> {
        if self.fail_sends {
            return Err(GateError::Host("homeserver said no".into()));
        }
        self.sent.lock().unwrap().push(event);
        Ok(())
    }
}

pub struct Harness {
    pub gate: Arc<Gatekeeper>,
    pub oracle: Arc<ScriptedOracle>,
    pub host: Arc<RecordingHost>,
    pub metrics: Arc<GateMetrics>,
}

pub fn harness(mode: EnforcementMode, verdict: Verdict) -> Harness {
    harness_with_host(RecordingHost::for_mode(mode), verdict)
}

/// Mode is detected from the host's descriptor.
pub fn harness_with_host(host: Arc<RecordingHost>, verdict: Verdict) -> Harness {
    let oracle = ScriptedOracle::new(verdict);
    let metrics = Arc::new(GateMetrics::default());
    let gate = Gatekeeper::detect(
        BotIdentity::new(BOT, "@_plural_"),
        oracle.clone(),
        host.clone(),
        Arc::clone(&metrics),
    );
    Harness {
        gate: Arc::new(gate),
        oracle,
        host,
        metrics,
    }
}

pub fn obj(v: Value) -> Map<String, Value> {
    v.as_object().cloned().expect("object")
}

pub fn text_message(sender: &str, event_id: &str) -> Event {
    Event::new(
        "m.room.message",
        ROOM,
        sender,
        obj(json!({
            "msgtype": "m.text",
            "body": "[Ash] hello there",
            "formatted_body": "<b>[Ash]</b> hello there"
        })),
    )
    .with_event_id(event_id)
}

pub async fn wait_until<F: Fn() -> bool>(f: F) -> bool {
    for _ in 0..200 {
        if f() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    f()
}

/// Serve an axum router on an ephemeral local port; returns `http://addr`.
pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Run a future with a generous upper bound so a hang fails the test.
pub async fn bounded<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(10), fut)
        .await
        .expect("test future timed out")
}
