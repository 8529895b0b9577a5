//! plural-gate sidecar.
//!
//! - Hook endpoints: /v1/check_event_allowed, /v1/check_visibility_can_see_event,
//!   /v1/on_new_event, /v1/hooks
//! - Ops: /healthz, /metrics
//! - Config path from argv[1], default `plural-gate.yaml`

use std::net::SocketAddr;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use plural_gate::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "plural-gate exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "plural-gate.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.sidecar.listen.parse()?;

    let state = app_state::AppState::new(&cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "plural-gate starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
