//! 1inch swap service
//!
//! Accepts swap requests over HTTP, checks the 1inch router allowance, approves
//! when needed, and signs and broadcasts the swap transaction on one of the
//! supported EVM chains.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod address;
mod api;
mod chain;
mod config;
mod error;
mod metrics;
mod quote;
mod swap;
mod tx;

use api::AppState;
use chain::ChainRegistry;
use config::{LogFormat, Settings};
use metrics::MetricsServer;
use quote::{OneInchClient, QuoteRateLimiter};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;

    init_logging(settings.logging.format);

    info!("Starting 1inch swap service v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration for {} chains", settings.chains.len());

    let chains = Arc::new(
        ChainRegistry::new(&settings).context("Failed to initialize chain providers")?,
    );

    // One limiter for the whole process; every request shares the 1inch quota.
    let rate_limiter = Arc::new(QuoteRateLimiter::from_config(&settings.quote));
    let quote_client = Arc::new(
        OneInchClient::new(&settings.quote, rate_limiter)
            .context("Failed to initialize 1inch client")?,
    );

    for (chain_id, healthy) in chains.health_check().await {
        if !healthy {
            warn!("Chain {} RPC is not reachable at startup", chain_id);
        }
    }

    let state = AppState {
        chains: chains.clone(),
        quote: quote_client,
        swap: settings.swap.clone(),
    };

    let api_handle = tokio::spawn({
        let api_config = settings.api.clone();
        async move {
            if let Err(e) = api::run_server(api_config, state).await {
                error!("API server error: {:#}", e);
            }
        }
    });

    let metrics_handle = if settings.metrics.enabled {
        let server = MetricsServer::new(settings.metrics.port);
        Some(tokio::spawn(async move {
            if let Err(e) = server.run().await {
                error!("Metrics server error: {:#}", e);
            }
        }))
    } else {
        None
    };

    info!("API server: http://{}:{}", settings.api.host, settings.api.port);
    if settings.metrics.enabled {
        info!("Metrics: http://0.0.0.0:{}/metrics", settings.metrics.port);
    }

    shutdown_signal().await;

    info!("Shutdown signal received, stopping...");

    api_handle.abort();
    if let Some(h) = metrics_handle {
        h.abort();
    }

    info!("1inch swap service stopped");
    Ok(())
}

fn init_logging(format: LogFormat) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,oneinch_swapper=debug,hyper=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}
