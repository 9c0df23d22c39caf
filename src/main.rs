// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use relational_auth::{
    api::router,
    auth::{Signer, SigningKeys},
    clock::SystemClock,
    config::Config,
    logging,
    state::AppState,
    store::{RedisStore, RevocationStore},
    users::InMemoryUserRepository,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init(config.log_format);

    info!("Starting Relational Auth");

    let keys = SigningKeys::from_files(&config.signing_key_path, &config.verifying_key_path)
        .map_err(|e| {
            error!(error = %e, "failed to load signing keys");
            e
        })?;
    info!("Signing keys loaded");

    info!(url = %config.redis_url, "Connecting to revocation store...");
    let store = RedisStore::connect(&config.redis_url, config.redis_key_prefix.clone())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to connect to revocation store");
            e
        })?;
    let store: Arc<dyn RevocationStore> = Arc::new(store);

    let signer = Signer::new(Arc::new(keys), store, Arc::new(SystemClock));
    let state = AppState::new(signer, Arc::new(InMemoryUserRepository::new()));
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Relational Auth listening on http://{addr} (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Relational Auth shutdown complete");
    Ok(())
}

/// Cancels `shutdown` on SIGINT or SIGTERM.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    shutdown.cancel();
}
