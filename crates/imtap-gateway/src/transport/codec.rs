//! Decode-once codec for the ingestion boundary.
//!
//! `WireMessage` (JSON, base64 payload) -> `MessageEnvelope` (raw bytes).
//! Failures are per item and never affect siblings in the same batch.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use imtap_core::error::{ImTapError, Result};
use imtap_core::protocol::{MessageEnvelope, WireMessage};

pub fn decode(msg: &WireMessage) -> Result<MessageEnvelope> {
    let encoded = msg
        .payload
        .as_deref()
        .ok_or_else(|| ImTapError::Transport("missing payload".into()))?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ImTapError::Transport(format!("invalid base64 payload: {e}")))?;
    Ok(MessageEnvelope::new(msg.method.clone(), bytes, msg.ts))
}
