//! Producer collaborator (browser capture session).
//!
//! Capture runs outside this process: a browser with the capture extension
//! posts batches to the ingestion endpoint on its own schedule. The gateway
//! only exposes the two control operations as status-string endpoints and
//! delegates them to a `Producer`.

use async_trait::async_trait;
use axum::extract::{Path, State};

use crate::app_state::AppState;

/// Upstream capture session. Both operations report a human-readable status.
#[async_trait]
pub trait Producer: Send + Sync {
    async fn launch(&self) -> String;
    async fn open_room(&self, room_id: &str) -> String;
}

/// Default producer: the browser session is operated by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedProducer;

pub const LIVE_ROOM_BASE: &str = "https://live.douyin.com/";

fn valid_room_id(room_id: &str) -> bool {
    !room_id.is_empty() && room_id.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
impl Producer for DetachedProducer {
    async fn launch(&self) -> String {
        "capture session is external: start a browser with the capture extension loaded; \
         it will post batches to /api/douyin/im"
            .to_string()
    }

    async fn open_room(&self, room_id: &str) -> String {
        if !valid_room_id(room_id) {
            return format!("error: room id must be numeric, got {room_id:?}");
        }
        format!("open {LIVE_ROOM_BASE}{room_id} in the capture browser")
    }
}

pub async fn launch(State(state): State<AppState>) -> String {
    tracing::info!("launch requested");
    state.producer().launch().await
}

pub async fn open_room(State(state): State<AppState>, Path(room_id): Path<String>) -> String {
    tracing::info!(%room_id, "open room requested");
    state.producer().open_room(&room_id).await
}
