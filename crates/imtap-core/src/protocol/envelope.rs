//! Ingestion envelopes.
//!
//! `WireMessage` is the JSON shape posted by the capture extension;
//! `MessageEnvelope` is what the dispatch engine consumes once the transport
//! has unwrapped the base64 payload.

use bytes::Bytes;
use serde::Deserialize;

/// One captured message as it arrives over HTTP.
///
/// Every field is optional at this layer: an item with missing pieces still
/// parses and the transport reports it per envelope. Items with wrongly typed
/// fields are rejected one by one at the HTTP boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireMessage {
    /// Method name (e.g. `WebcastChatMessage`).
    #[serde(default)]
    pub method: String,
    /// Base64 (standard alphabet) protobuf bytes.
    #[serde(default)]
    pub payload: Option<String>,
    /// Capture time, epoch millis.
    #[serde(default)]
    pub ts: Option<i64>,
}

/// Unit of dispatch: method, raw payload, capture time.
#[derive(Debug, Clone)]
pub struct MessageEnvelope {
    method: String,
    payload: Bytes,
    captured_at_ms: Option<i64>,
}

impl MessageEnvelope {
    pub fn new(method: impl Into<String>, payload: impl Into<Bytes>, captured_at_ms: Option<i64>) -> Self {
        Self {
            method: method.into(),
            payload: payload.into(),
            captured_at_ms,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn captured_at_ms(&self) -> Option<i64> {
        self.captured_at_ms
    }
}
