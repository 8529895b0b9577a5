//! Decision client: asks the oracle whether an event is a proxy message.
//!
//! The call is bounded by a hard timeout and fails open: any error, timeout,
//! or unparseable reply classifies the event as "not proxied".

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use plural_gate_core::error::{GateError, Result};
use plural_gate_core::protocol::oracle::{ClassificationRequest, OracleVerdict};

use crate::obs::GateMetrics;

/// Outcome of one classification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Block,
    Allow,
    /// Oracle unreachable or misbehaving; treated as `Allow`.
    Unavailable,
}

impl Verdict {
    pub fn is_proxy(self) -> bool {
        self == Verdict::Block
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Block => "block",
            Verdict::Allow => "allow",
            Verdict::Unavailable => "unavailable",
        }
    }
}

/// Anything that can answer "is this a proxy message?".
/// Implementations must not fail: errors map to `Verdict::Unavailable`.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn verdict(&self, req: &ClassificationRequest) -> Verdict;

    /// true = block.
    async fn classify(&self, req: &ClassificationRequest) -> bool {
        self.verdict(req).await.is_proxy()
    }
}

/// Oracle reached over HTTP (`POST <service_url>`).
pub struct HttpOracle {
    http: reqwest::Client,
    service_url: String,
    timeout: Duration,
    metrics: Arc<GateMetrics>,
}

impl HttpOracle {
    pub fn new(
        service_url: impl Into<String>,
        timeout: Duration,
        metrics: Arc<GateMetrics>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GateError::Internal(format!("oracle http client build failed: {e}")))?;
        Ok(Self {
            http,
            service_url: service_url.into(),
            timeout,
            metrics,
        })
    }

    /// Raw round trip; errors are surfaced so `classify` can log them.
    pub async fn try_classify(&self, req: &ClassificationRequest) -> Result<bool> {
        let call = async {
            let resp = self
                .http
                .post(&self.service_url)
                .json(req)
                .send()
                .await
                .map_err(map_reqwest)?;

            let status = resp.status();
            if !status.is_success() {
                return Err(GateError::Oracle(format!("status {status}")));
            }

            let verdict: OracleVerdict = resp
                .json()
                .await
                .map_err(|e| GateError::Oracle(format!("invalid verdict: {e}")))?;
            Ok::<bool, GateError>(verdict.is_block())
        };

        // reqwest's own timeout covers the request; this bounds body reads too.
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| GateError::OracleTimeout)?
    }
}

fn map_reqwest(e: reqwest::Error) -> GateError {
    if e.is_timeout() {
        GateError::OracleTimeout
    } else {
        GateError::Oracle(e.to_string())
    }
}

fn failure_kind(e: &GateError) -> &'static str {
    match e {
        GateError::OracleTimeout => "timeout",
        _ => "error",
    }
}

#[async_trait]
impl Classifier for HttpOracle {
    async fn verdict(&self, req: &ClassificationRequest) -> Verdict {
        let started = Instant::now();
        let out = self.try_classify(req).await;
        self.metrics.oracle_latency.observe(&[], started.elapsed());

        match out {
            Ok(true) => Verdict::Block,
            Ok(false) => Verdict::Allow,
            Err(e) => {
                self.metrics.oracle_failures.inc(&[("kind", failure_kind(&e))]);
                tracing::warn!(
                    error = %e,
                    room_id = %req.room_id,
                    event_id = req.event_id.as_deref().unwrap_or(""),
                    "oracle unavailable; failing open"
                );
                Verdict::Unavailable
            }
        }
    }
}
