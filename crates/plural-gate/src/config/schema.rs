use std::time::Duration;

use serde::Deserialize;

use plural_gate_core::error::{GateError, Result};
use plural_gate_core::normalize::DEFAULT_PROXY_PREFIX;
use plural_gate_core::protocol::host::{CapabilityDescriptor, Hook};
use plural_gate_core::BotIdentity;

/// Upper bound on the oracle round trip; the host pipeline waits on it.
pub const MAX_ORACLE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    pub version: u32,

    #[serde(default)]
    pub gatekeeper: GatekeeperSection,

    #[serde(default)]
    pub sidecar: SidecarSection,

    #[serde(default)]
    pub host: HostSection,
}

impl GateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GateError::UnsupportedVersion(self.version));
        }
        self.gatekeeper.validate()?;
        self.host.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatekeeperSection {
    #[serde(default = "default_service_url")]
    pub service_url: String,

    #[serde(default = "default_bot_id")]
    pub bot_id: String,

    #[serde(default = "default_proxy_sender_prefix")]
    pub proxy_sender_prefix: String,

    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,
}

impl Default for GatekeeperSection {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            bot_id: default_bot_id(),
            proxy_sender_prefix: default_proxy_sender_prefix(),
            oracle_timeout_ms: default_oracle_timeout_ms(),
        }
    }
}

impl GatekeeperSection {
    pub fn validate(&self) -> Result<()> {
        require_http_url("gatekeeper.service_url", &self.service_url)?;
        if !self.bot_id.starts_with('@') {
            return Err(GateError::BadRequest(
                "gatekeeper.bot_id must be a user id starting with '@'".into(),
            ));
        }
        if !self.proxy_sender_prefix.starts_with('@') {
            return Err(GateError::BadRequest(
                "gatekeeper.proxy_sender_prefix must start with '@'".into(),
            ));
        }
        if !(1..=MAX_ORACLE_TIMEOUT_MS).contains(&self.oracle_timeout_ms) {
            return Err(GateError::BadRequest(format!(
                "gatekeeper.oracle_timeout_ms must be between 1 and {MAX_ORACLE_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    pub fn bot_identity(&self) -> BotIdentity {
        BotIdentity::new(self.bot_id.clone(), self.proxy_sender_prefix.clone())
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }
}

fn default_service_url() -> String {
    "http://app-service:9000/check".into()
}
fn default_bot_id() -> String {
    "@plural_bot:localhost".into()
}
fn default_proxy_sender_prefix() -> String {
    DEFAULT_PROXY_PREFIX.into()
}
fn default_oracle_timeout_ms() -> u64 {
    MAX_ORACLE_TIMEOUT_MS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidecarSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for SidecarSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

fn default_listen() -> String {
    "127.0.0.1:9100".into()
}

/// What the host (homeserver module shim) declares it can call, plus how to
/// reach the homeserver for redactions.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostSection {
    #[serde(default = "default_api_version")]
    pub api_version: u32,

    /// Hooks the host registers. Empty means "not declared": only the
    /// mandatory hooks are assumed.
    #[serde(default)]
    pub hooks: Vec<Hook>,

    #[serde(default = "default_homeserver_url")]
    pub homeserver_url: String,

    #[serde(default)]
    pub as_token: String,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            hooks: Vec::new(),
            homeserver_url: default_homeserver_url(),
            as_token: String::new(),
        }
    }
}

impl HostSection {
    pub fn validate(&self) -> Result<()> {
        require_http_url("host.homeserver_url", &self.homeserver_url)
    }

    pub fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor {
            api_version: self.api_version,
            hooks: self.hooks.clone(),
        }
    }
}

fn default_api_version() -> u32 {
    1
}
fn default_homeserver_url() -> String {
    "http://localhost:8008".into()
}

fn require_http_url(field: &str, url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| GateError::BadRequest(format!("{field} is not a valid url: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(GateError::BadRequest(format!(
            "{field} must use http or https (got {other})"
        ))),
    }
}
