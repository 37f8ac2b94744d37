//! Axum router wiring.
//!
//! Paths under `/api/douyin` match what the capture extension calls.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, producer, transport};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.cfg().server.max_body_bytes;
    Router::new()
        .route("/api/douyin/im", post(transport::ingest::receive_batch))
        .route("/api/douyin/launch", get(producer::launch))
        .route("/api/douyin/room/:room_id", get(producer::open_room))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
