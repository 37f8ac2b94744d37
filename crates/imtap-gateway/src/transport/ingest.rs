//! HTTP ingestion endpoint for captured batches.
//!
//! Fire-and-forget: the producer always gets `202 Accepted` for any JSON
//! array (or `null`). Per-envelope problems (malformed item, bad base64, full
//! queue, oversized batch) are counted and reported through the engine, never
//! returned.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;

use imtap_core::protocol::WireMessage;
use imtap_core::FailureKind;

use crate::app_state::AppState;
use crate::transport::codec;

/// Per-batch bookkeeping, logged once per request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub received: usize,
    pub accepted: usize,
    pub dropped: usize,
}

/// Unwrap each item and hand it to the dispatch engine.
///
/// `None` (a JSON `null` body) and empty batches are no-ops. Items past
/// `server.max_batch` are dropped with one transport failure for the batch.
pub async fn ingest_batch(state: &AppState, batch: Option<Vec<WireMessage>>) -> BatchSummary {
    let Some(batch) = batch.filter(|b| !b.is_empty()) else {
        return BatchSummary::default();
    };

    let engine = state.engine();
    let metrics = state.metrics();
    let max = state.cfg().server.max_batch;

    let mut summary = BatchSummary {
        received: batch.len(),
        ..BatchSummary::default()
    };
    metrics.envelopes_received.add(&[], batch.len() as u64);

    if batch.len() > max {
        let over = batch.len() - max;
        summary.dropped += over;
        engine
            .report_failure(
                FailureKind::Transport,
                "batch",
                format!("batch of {} exceeds server.max_batch={max}; {over} envelopes dropped", batch.len()),
            )
            .await;
    }

    for msg in batch.into_iter().take(max) {
        match codec::decode(&msg) {
            Ok(env) => match engine.submit(env).await {
                Ok(()) => summary.accepted += 1,
                Err(_) => summary.dropped += 1,
            },
            Err(e) => {
                summary.dropped += 1;
                engine.report_failure(e.kind(), &msg.method, e.to_string()).await;
            }
        }
    }

    tracing::info!(
        received = summary.received,
        accepted = summary.accepted,
        dropped = summary.dropped,
        "im batch"
    );
    summary
}

/// Method label for an item that did not parse: its `method` when that is a
/// string, else `unknown`.
fn raw_method(item: &Value) -> &str {
    item.get("method").and_then(Value::as_str).unwrap_or("unknown")
}

/// Parse raw batch items one by one. Items that do not fit `WireMessage`
/// (wrong field types, not an object) are counted and reported here; the
/// rest of the batch goes on.
pub async fn parse_items(state: &AppState, items: Vec<Value>) -> Vec<WireMessage> {
    let mut out = Vec::with_capacity(items.len());
    let mut malformed = 0usize;
    for item in items {
        match WireMessage::deserialize(&item) {
            Ok(msg) => out.push(msg),
            Err(e) => {
                malformed += 1;
                state
                    .engine()
                    .report_failure(
                        FailureKind::Transport,
                        raw_method(&item),
                        format!("malformed batch item: {e}"),
                    )
                    .await;
            }
        }
    }
    if malformed > 0 {
        state.metrics().envelopes_received.add(&[], malformed as u64);
        tracing::debug!(malformed, "im batch items skipped");
    }
    out
}

pub async fn receive_batch(
    State(state): State<AppState>,
    Json(batch): Json<Option<Vec<Value>>>,
) -> StatusCode {
    let batch = match batch {
        Some(items) => Some(parse_items(&state, items).await),
        None => None,
    };
    ingest_batch(&state, batch).await;
    StatusCode::ACCEPTED
}
