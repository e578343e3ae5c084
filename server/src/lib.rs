//! # MEP Attendance Backend
//!
//! Public-information API over European Parliament attendance and voting
//! records. The heavy lifting lives in the `dataset` crate; this crate is
//! the HTTP surface around it.
//!
//! # Routes
//! - `GET /api/health` — liveness probe
//! - `GET /api/meps?q=&group=&country=` — roster search
//! - `GET /api/meps/{id}` — full MEP record
//! - `GET /api/meps/{id}/notable` — notable votes for one MEP
//! - `GET /api/votes/{vote_id}` — vote catalog entry
//! - `GET /api/leaderboard?limit=` — top/bottom attendance boards
//!
//! # Dataset
//! The store loads lazily from `DATASET_DIR` on the first request that
//! needs it. Startup warms it eagerly so the first user does not pay the
//! parse cost; a warm-up failure is logged and left for requests to retry,
//! since the dataset may appear after an ingest run completes.
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use routes::{
    health_handler, leaderboard_handler, mep_handler, notable_handler, search_handler,
    vote_handler,
};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new();

    match state.store.get() {
        Ok(store) => info!(meps = store.meps().len(), "dataset warmed"),
        Err(e) => warn!("dataset warm-up failed, requests will retry: {e}"),
    }

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/meps", get(search_handler))
        .route("/api/meps/:id", get(mep_handler))
        .route("/api/meps/:id/notable", get(notable_handler))
        .route("/api/votes/:vote_id", get(vote_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Server stopped");
}

async fn shutdown_signal() {
    let interrupt = async {
        ctrl_c().await.expect("ctrl-c handler");

        info!("Interrupt received, draining connections");
    };

    #[cfg(unix)]
    let sigterm = async {
        signal(SignalKind::terminate())
            .expect("SIGTERM handler")
            .recv()
            .await;

        info!("SIGTERM received, draining connections");
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = sigterm => {},
    }
}
