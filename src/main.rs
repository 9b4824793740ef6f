// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, error::Error, sync::Arc, time::Duration};

use axum_server::tls_rustls::RustlsConfig;
use record_exchange::{
    api::router,
    blockchain::{InMemoryRegistry, PermissionOracle, RegistryClient},
    config::{AppConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    state::AppState,
    storage::{ContentStore, IpfsStore, MemoryStore},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Record exchange server failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.pretty().init(),
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "failed to install rustls crypto provider")?;

    let config = AppConfig::from_env()?;

    let oracle = build_oracle(&config)?;
    let store = build_store(&config)?;

    if !store.is_available().await {
        tracing::warn!(store = store.kind(), "Content store is not reachable at startup");
    }

    let state = AppState::new(oracle, store).with_max_upload_bytes(config.max_upload_bytes);
    let app = router(state);

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let addr = config.bind_addr;
    match &config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;

            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            let token = shutdown.clone();
            tokio::spawn(async move {
                token.cancelled().await;
                shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            tracing::info!(%addr, "Record exchange listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "Record exchange listening on http (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await?;
        }
    }

    tracing::info!("Record exchange server stopped");
    Ok(())
}

fn build_oracle(config: &AppConfig) -> Result<Arc<dyn PermissionOracle>, Box<dyn Error>> {
    match &config.ledger {
        Some(ledger) => {
            let client = RegistryClient::connect(
                &ledger.rpc_url,
                &ledger.contract_address,
                config.upstream_timeout,
            )?;
            tracing::info!(contract = %client.address(), "Using on-chain permission registry");
            Ok(Arc::new(client))
        }
        None => {
            tracing::warn!(
                issuers = config.dev_verified_issuers.len(),
                "No ledger configured; using in-memory permission registry (development only)"
            );
            Ok(Arc::new(InMemoryRegistry::with_issuers(
                config.dev_verified_issuers.iter().copied(),
            )))
        }
    }
}

fn build_store(config: &AppConfig) -> Result<Arc<dyn ContentStore>, Box<dyn Error>> {
    match &config.ipfs_api_url {
        Some(url) => {
            let store = IpfsStore::connect(url, config.upstream_timeout)?;
            tracing::info!(api = %url, "Using IPFS content store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No IPFS_API_URL configured; using in-memory content store (development only)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Cancel `shutdown` on SIGINT or SIGTERM.
async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
