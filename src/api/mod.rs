//! HTTP API: swap submission, health and chain listing

use crate::chain::{ChainRegistry, SUPPORTED_CHAIN_IDS};
use crate::config::{ApiConfig, SwapConfig};
use crate::error::SwapResult;
use crate::quote::QuoteService;
use crate::swap::{SwapCoordinator, SwapOutcome, SwapRequest};
use crate::tx::TransactionSigner;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

const WELCOME_MESSAGE: &str =
    "Welcome to 1inch Swap API. Use /swap endpoint to perform token swaps.";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub chains: Arc<ChainRegistry>,
    pub quote: Arc<dyn QuoteService>,
    pub swap: SwapConfig,
}

/// Build the router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/swap", post(swap))
        .route("/health", get(health_check))
        .route("/chains", get(get_chains))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP API server
pub async fn run_server(config: ApiConfig, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;
    axum::serve(listener, app).await.context("API server stopped")?;

    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Run one swap. Completed workflows answer 200 whether or not they succeeded;
/// requests rejected before the workflow starts answer 500.
async fn swap(State(state): State<AppState>, Json(request): Json<SwapRequest>) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "swap",
        %request_id,
        chain_id = request.chain_id,
        wallet = %request.wallet_address
    );

    match execute_swap(&state, &request).instrument(span).await {
        Ok(outcome) => {
            info!(%request_id, success = outcome.success, "{}", outcome.message);
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(e) => {
            if e.is_setup_error() {
                warn!(%request_id, "Swap request rejected: {}", e);
            } else {
                error!(%request_id, "Swap request failed: {}", e);
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: format!("Swap failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}

async fn execute_swap(state: &AppState, request: &SwapRequest) -> SwapResult<SwapOutcome> {
    let node = state.chains.resolve(request.chain_id)?;
    let signer = TransactionSigner::from_private_key(&request.private_key)?;
    let coordinator = SwapCoordinator::new(
        &request.wallet_address,
        signer,
        state.quote.clone(),
        node,
        state.swap.clone(),
    )?;

    info!("Swapping {} of {} for {}", request.amount, request.src_token, request.dst_token);
    coordinator
        .perform_swap(
            &request.src_token,
            &request.dst_token,
            &request.amount,
            request.slippage,
        )
        .await
}

/// Health check endpoint - basic liveness
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_chains(State(state): State<AppState>) -> impl IntoResponse {
    Json(ChainsResponse {
        supported: SUPPORTED_CHAIN_IDS.to_vec(),
        configured: state
            .chains
            .chain_names()
            .into_iter()
            .map(|(chain_id, name)| ChainEntry { chain_id, name })
            .collect(),
    })
}

// Response types

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct ChainEntry {
    chain_id: u64,
    name: String,
}

#[derive(Serialize)]
struct ChainsResponse {
    supported: Vec<u64>,
    configured: Vec<ChainEntry>,
}
