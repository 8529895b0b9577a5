//! Hook endpoints called by the homeserver module shim.
//!
//! Handlers never fail: whatever the body or the engine does, the host gets a
//! well-formed "allow" answer. Bodies are decoded by hand so that no extractor
//! rejection reaches the host; an undecodable body keeps the original event.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use plural_gate_core::event::string_or_empty;
use plural_gate_core::protocol::host::Hook;
use plural_gate_core::Event;

use crate::app_state::AppState;
use crate::enforce::AllowDecision;
use crate::host::EnforcementMode;

#[derive(Debug, Deserialize)]
pub struct VisibilityReq {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub viewer: String,
    #[serde(default)]
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisibilityResp {
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct HooksResp {
    pub mode: EnforcementMode,
    pub hooks: Vec<Hook>,
}

fn decode<T: DeserializeOwned>(hook: &'static str, body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(hook, error = %e, "undecodable hook body; allowing");
            None
        }
    }
}

pub async fn check_event_allowed(State(app): State<AppState>, body: Bytes) -> Json<AllowDecision> {
    let decision = match decode::<Event>("check_event_allowed", &body) {
        Some(event) => app.gate().check_event_allowed(&event).await,
        None => AllowDecision::keep_original(),
    };
    Json(decision)
}

pub async fn check_visibility_can_see_event(
    State(app): State<AppState>,
    body: Bytes,
) -> Json<VisibilityResp> {
    let visible = match decode::<VisibilityReq>("check_visibility_can_see_event", &body) {
        Some(req) => {
            app.gate()
                .check_visibility_can_see_event(&req.viewer, &req.event)
                .await
        }
        None => true,
    };
    Json(VisibilityResp { visible })
}

pub async fn on_new_event(State(app): State<AppState>, body: Bytes) -> StatusCode {
    if let Some(event) = decode::<Event>("on_new_event", &body) {
        app.gate().on_new_event(&event).await;
    }
    StatusCode::NO_CONTENT
}

pub async fn hooks(State(app): State<AppState>) -> Json<HooksResp> {
    Json(HooksResp {
        mode: app.gate().mode(),
        hooks: app.gate().registered_hooks(),
    })
}
