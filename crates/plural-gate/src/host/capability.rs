//! Startup capability detection -> enforcement mode.

use serde::Serialize;

use plural_gate_core::protocol::host::Hook;

use super::HostApi;

/// How proxied messages are suppressed. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementMode {
    /// Host filters visibility per viewer; the broadcast stays intact.
    Blackhole,
    /// No per-viewer filter; scrub the text in the broadcast itself.
    FallbackClear,
}

impl EnforcementMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EnforcementMode::Blackhole => "blackhole",
            EnforcementMode::FallbackClear => "fallback_clear",
        }
    }

    /// Hooks the host must register for this mode.
    pub fn required_hooks(self) -> Vec<Hook> {
        match self {
            EnforcementMode::Blackhole => vec![
                Hook::CheckEventAllowed,
                Hook::CheckVisibilityCanSeeEvent,
                Hook::OnNewEvent,
            ],
            EnforcementMode::FallbackClear => vec![Hook::CheckEventAllowed, Hook::OnNewEvent],
        }
    }
}

/// Query the host once and pick a mode. Any doubt resolves to `FallbackClear`.
pub fn detect_mode(host: &dyn HostApi) -> EnforcementMode {
    let desc = match host.capabilities() {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(error = %e, "capability query failed; using fallback_clear");
            return EnforcementMode::FallbackClear;
        }
    };

    if !desc.is_supported_version() {
        tracing::warn!(
            api_version = desc.api_version,
            "unsupported host api version; using fallback_clear"
        );
        return EnforcementMode::FallbackClear;
    }

    let mode = if desc.offers(Hook::CheckVisibilityCanSeeEvent) {
        EnforcementMode::Blackhole
    } else {
        EnforcementMode::FallbackClear
    };
    tracing::info!(mode = mode.as_str(), hooks = ?desc.hooks, "enforcement mode selected");
    mode
}
