//! Shared application state for the sidecar.
//!
//! Startup order: metrics -> oracle client -> host adapter -> capability
//! detection (once) -> engine. Errors are returned, not panicked, so `main`
//! can report them.

use std::sync::Arc;

use plural_gate_core::error::Result;

use crate::classify::{Classifier, HttpOracle};
use crate::config::GateConfig;
use crate::enforce::Gatekeeper;
use crate::host::{HostApi, MatrixHost};
use crate::obs::GateMetrics;

#[derive(Clone)]
pub struct AppState {
    gate: Arc<Gatekeeper>,
    metrics: Arc<GateMetrics>,
}

impl AppState {
    pub fn new(cfg: &GateConfig) -> Result<Self> {
        let metrics = Arc::new(GateMetrics::default());

        let oracle: Arc<dyn Classifier> = Arc::new(HttpOracle::new(
            cfg.gatekeeper.service_url.clone(),
            cfg.gatekeeper.oracle_timeout(),
            Arc::clone(&metrics),
        )?);
        let host: Arc<dyn HostApi> = Arc::new(MatrixHost::new(&cfg.host)?);

        let gate = Gatekeeper::detect(
            cfg.gatekeeper.bot_identity(),
            oracle,
            host,
            Arc::clone(&metrics),
        );
        tracing::info!(
            mode = gate.mode().as_str(),
            bot_id = gate.bot().bot_id(),
            service_url = %cfg.gatekeeper.service_url,
            "gatekeeper ready"
        );

        Ok(Self::from_parts(Arc::new(gate), metrics))
    }

    /// Assemble from an existing engine (tests, embedding).
    pub fn from_parts(gate: Arc<Gatekeeper>, metrics: Arc<GateMetrics>) -> Self {
        Self { gate, metrics }
    }

    pub fn gate(&self) -> &Gatekeeper {
        &self.gate
    }

    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }

    /// Gauges computed at scrape time.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("plural_gate_cache_entries", self.gate.cache().len() as u64)]
    }
}
