#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use imtap_core::protocol::method;
use imtap_core::protocol::webcast::LikeMessage;
use imtap_gateway::app_state::AppState;
use imtap_gateway::config::TapConfig;
use imtap_gateway::producer::Producer;
use imtap_gateway::report::{LiveEvent, Report};
use imtap_gateway::router::build_router;

use common::{assert_quiet, recv_n, state_with_channel, wire};

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(app: Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn im_batch_is_accepted_and_dispatched() {
    let (state, mut rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    let like = LikeMessage {
        count: 3,
        total: 120,
        ..Default::default()
    };
    let body = serde_json::to_string(&serde_json::json!([{
        "method": method::LIKE,
        "payload": wire(method::LIKE, &like).payload,
        "ts": 1_700_000_000_000i64,
    }]))
    .unwrap();

    let (status, text) = body_string(app, post_json("/api/douyin/im", body)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(text.is_empty());

    let got = recv_n(&mut rx, 1).await;
    assert_eq!(
        got[0],
        Report::Event(LiveEvent::Like {
            user: "anonymous".into(),
            count: 3,
            total: 120,
        })
    );
}

#[tokio::test]
async fn item_missing_payload_is_reported_not_rejected() {
    let (state, mut rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    let body = r#"[{"method":"WebcastChatMessage"}]"#.to_string();
    let (status, _) = body_string(app, post_json("/api/douyin/im", body)).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let got = recv_n(&mut rx, 1).await;
    match &got[0] {
        Report::Failure(f) => {
            assert_eq!(f.kind.as_str(), "TRANSPORT_ERROR");
            assert_eq!(f.method, method::CHAT);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn null_body_keeps_engine_running() {
    let (state, mut rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    let (status, _) = body_string(app, post_json("/api/douyin/im", "null".into())).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_quiet(&mut rx).await;
    assert_eq!(state.metrics().envelopes_received.total(), 0);
    assert!(!state.is_draining());
}

#[tokio::test]
async fn wrongly_typed_item_fails_alone() {
    let (state, mut rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    // payload = LikeMessage{count: 3, total: 120}
    let body = r#"[
        {"method": 5, "payload": "EAMYeA=="},
        {"method": "WebcastChatMessage", "payload": "GgJoaQ==", "ts": "yesterday"},
        "not an object",
        {"method": "WebcastLikeMessage", "payload": "EAMYeA==", "ts": 1700000000000}
    ]"#
    .to_string();
    let (status, _) = body_string(app, post_json("/api/douyin/im", body)).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let got = recv_n(&mut rx, 4).await;
    let mut failed: Vec<(&str, &str)> = got
        .iter()
        .filter_map(|r| match r {
            Report::Failure(f) => Some((f.kind.as_str(), f.method.as_str())),
            Report::Event(_) => None,
        })
        .collect();
    failed.sort_unstable();
    assert_eq!(
        failed,
        vec![
            ("TRANSPORT_ERROR", "WebcastChatMessage"),
            ("TRANSPORT_ERROR", "unknown"),
            ("TRANSPORT_ERROR", "unknown"),
        ]
    );
    assert!(got.contains(&Report::Event(LiveEvent::Like {
        user: "anonymous".into(),
        count: 3,
        total: 120,
    })));
    assert_quiet(&mut rx).await;
    assert_eq!(state.metrics().envelopes_received.total(), 4);
}

#[tokio::test]
async fn non_array_body_is_client_error() {
    let (state, _rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    let resp = app
        .oneshot(post_json("/api/douyin/im", r#"{"method":"WebcastChatMessage"}"#.into()))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn malformed_json_is_client_error() {
    let (state, _rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    let resp = app
        .oneshot(post_json("/api/douyin/im", "{not json".into()))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn ops_endpoints() {
    let (state, _rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    let (status, text) = body_string(app.clone(), get("/healthz")).await;
    assert_eq!((status, text.as_str()), (StatusCode::OK, "ok"));

    let (status, _) = body_string(app.clone(), get("/readyz")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, text) = body_string(app.clone(), get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("imtap_dispatch_queue_depth"));
    assert!(text.contains("imtap_draining 0"));

    state.shutdown().await.unwrap();
    let (status, _) = body_string(app, get("/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn room_route_uses_detached_producer() {
    let (state, _rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.clone());

    let (status, text) = body_string(app, get("/api/douyin/room/7319")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("https://live.douyin.com/7319"), "{text}");
}

struct Recording;

#[async_trait]
impl Producer for Recording {
    async fn launch(&self) -> String {
        "launched".into()
    }

    async fn open_room(&self, room_id: &str) -> String {
        format!("opened {room_id}")
    }
}

#[tokio::test]
async fn custom_producer_is_used_by_routes() {
    let (state, _rx) = state_with_channel(TapConfig::default());
    let app = build_router(state.with_producer(Arc::new(Recording)));

    let (_, text) = body_string(app.clone(), get("/api/douyin/launch")).await;
    assert_eq!(text, "launched");
    let (_, text) = body_string(app, get("/api/douyin/room/42")).await;
    assert_eq!(text, "opened 42");
}
