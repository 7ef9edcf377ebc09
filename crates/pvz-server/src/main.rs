//! Pickup point reception server
//!
//! Configuration comes from environment variables, overridden by
//! command-line flags. State lives in memory for the life of the process.

mod cli;
mod telemetry;

use std::sync::Arc;

use clap::Parser;
use pvz_core::{
    AppState, InMemoryPickupPointRepository, InMemoryReceptionRepository, JwtAuthority,
    ServiceConfig, create_router,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let bootstrap = args.clone().apply(ServiceConfig::from_env());
    telemetry::init_tracing(&bootstrap.log)?;

    // Loaded again now that a subscriber is installed, so bad values get reported.
    let config = args.apply(ServiceConfig::from_env());

    #[cfg(feature = "prometheus")]
    telemetry::install_prometheus(&config.metrics)?;

    let state = AppState::new(
        Arc::new(InMemoryPickupPointRepository::new()),
        Arc::new(InMemoryReceptionRepository::new()),
        JwtAuthority::from_config(&config.auth),
    );
    let app = create_router(&config.http).with_state(state);

    let addr = config.http.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        request_timeout = ?config.http.request_timeout,
        "pvz server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("pvz server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
