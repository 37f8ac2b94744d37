#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use prost::Message;
use tokio::sync::mpsc;

use imtap_core::protocol::WireMessage;
use imtap_gateway::app_state::AppState;
use imtap_gateway::config::TapConfig;
use imtap_gateway::report::{ChannelSink, Report};

/// App state whose reports land in a channel instead of the log.
pub fn state_with_channel(cfg: TapConfig) -> (AppState, mpsc::Receiver<Report>) {
    let (sink, rx) = ChannelSink::new(1024);
    let state = AppState::with_sink(cfg, Arc::new(sink)).expect("state");
    (state, rx)
}

/// Wire item the way the capture extension sends it.
pub fn wire<M: Message>(method: &str, msg: &M) -> WireMessage {
    WireMessage {
        method: method.to_string(),
        payload: Some(STANDARD.encode(msg.encode_to_vec())),
        ts: Some(1_700_000_000_000),
    }
}

pub fn wire_raw(method: &str, payload: &str) -> WireMessage {
    WireMessage {
        method: method.to_string(),
        payload: Some(payload.to_string()),
        ts: None,
    }
}

/// Receive exactly `n` reports, failing the test if they don't arrive.
pub async fn recv_n(rx: &mut mpsc::Receiver<Report>, n: usize) -> Vec<Report> {
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let r = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for report {}/{n}", i + 1))
            .expect("sink closed");
        out.push(r);
    }
    out
}

/// Nothing else is reported within a short window.
pub async fn assert_quiet(rx: &mut mpsc::Receiver<Report>) {
    let extra = tokio::time::timeout(Duration::from_millis(150), rx.recv()).await;
    assert!(extra.is_err(), "unexpected report: {extra:?}");
}
