//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - Chain RPC reachability
//! - Quote API requests and rate limiter waits
//! - Transaction broadcasts and gas fallbacks
//! - Swap outcomes and latency

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram, register_histogram_vec,
    CounterVec, Encoder, GaugeVec, Histogram, HistogramVec, TextEncoder,
};
use std::net::SocketAddr;
use tracing::info;

lazy_static! {
    // Chain metrics
    pub static ref CHAIN_REACHABLE: GaugeVec = register_gauge_vec!(
        "swapper_chain_reachable",
        "Chain RPC reachability (1=reachable, 0=unreachable)",
        &["chain_id"]
    ).unwrap();

    // Quote API metrics
    pub static ref QUOTE_REQUESTS: CounterVec = register_counter_vec!(
        "swapper_quote_requests_total",
        "Requests to the 1inch API by endpoint and outcome",
        &["endpoint", "outcome"]
    ).unwrap();

    pub static ref RATE_LIMIT_WAIT: Histogram = register_histogram!(
        "swapper_rate_limit_wait_seconds",
        "Time spent waiting for the quote rate limiter",
        vec![0.0, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]
    ).unwrap();

    // Transaction metrics
    pub static ref TX_SUBMITTED: CounterVec = register_counter_vec!(
        "swapper_transactions_submitted_total",
        "Total transactions broadcast",
        &["chain_id"]
    ).unwrap();

    pub static ref TX_FAILED: CounterVec = register_counter_vec!(
        "swapper_transactions_failed_total",
        "Total transactions rejected on broadcast",
        &["chain_id"]
    ).unwrap();

    pub static ref GAS_FALLBACKS: CounterVec = register_counter_vec!(
        "swapper_gas_fallbacks_total",
        "Gas limits that fell back to the configured default",
        &["chain_id"]
    ).unwrap();

    // Swap metrics
    pub static ref APPROVALS_SENT: CounterVec = register_counter_vec!(
        "swapper_approvals_sent_total",
        "Approval transactions broadcast",
        &["chain_id"]
    ).unwrap();

    pub static ref SWAPS: CounterVec = register_counter_vec!(
        "swapper_swaps_total",
        "Swap requests by result",
        &["chain_id", "result"]
    ).unwrap();

    pub static ref SWAP_LATENCY: HistogramVec = register_histogram_vec!(
        "swapper_swap_latency_seconds",
        "Swap workflow latency",
        &["chain_id"],
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]
    ).unwrap();
}

/// Prometheus metrics server
pub struct MetricsServer {
    port: u16,
}

impl MetricsServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub async fn run(&self) -> Result<()> {
        let app = Router::new().route("/metrics", get(metrics_handler));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Starting metrics server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind metrics server to {}", addr))?;
        axum::serve(listener, app)
            .await
            .context("Metrics server stopped")?;

        Ok(())
    }
}

async fn metrics_handler() -> Result<String, (StatusCode, String)> {
    render().map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// Text exposition of every registered metric
pub fn render() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

// Helper functions to record metrics

pub fn record_chain_health(chain_id: u64, healthy: bool) {
    CHAIN_REACHABLE
        .with_label_values(&[&chain_id.to_string()])
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_quote_request(endpoint: &str, outcome: &str) {
    QUOTE_REQUESTS.with_label_values(&[endpoint, outcome]).inc();
}

pub fn record_rate_limit_wait(seconds: f64) {
    RATE_LIMIT_WAIT.observe(seconds);
}

pub fn record_tx_submitted(chain_id: u64) {
    TX_SUBMITTED
        .with_label_values(&[&chain_id.to_string()])
        .inc();
}

pub fn record_tx_failed(chain_id: u64) {
    TX_FAILED.with_label_values(&[&chain_id.to_string()]).inc();
}

pub fn record_gas_fallback(chain_id: u64) {
    GAS_FALLBACKS
        .with_label_values(&[&chain_id.to_string()])
        .inc();
}

pub fn record_approval_sent(chain_id: u64) {
    APPROVALS_SENT
        .with_label_values(&[&chain_id.to_string()])
        .inc();
}

/// Count a finished swap and observe how long it took
pub fn record_swap(chain_id: u64, result: &str, latency_secs: f64) {
    let chain = chain_id.to_string();
    SWAPS.with_label_values(&[&chain, result]).inc();
    SWAP_LATENCY.with_label_values(&[&chain]).observe(latency_secs);
}
