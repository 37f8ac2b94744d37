#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use imtap_gateway::config::{self, OverflowPolicy};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
dispatch:
  workerz: 8 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "127.0.0.1:8080");
    assert_eq!(cfg.dispatch.workers, 4);
    assert_eq!(cfg.dispatch.overflow, OverflowPolicy::Reject);
    assert!(cfg.handlers.disabled.is_empty());
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "0.0.0.0:9000"
  max_batch: 200
dispatch:
  workers: 8
  queue_capacity: 64
  overflow: block
  submit_timeout_ms: 20
  task_timeout_ms: 1000
  drain_timeout_ms: 0
handlers:
  disabled: ["WebcastRoomStatsMessage"]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 9000);
    assert_eq!(cfg.dispatch.overflow, OverflowPolicy::Block);
    assert!(!cfg.handlers.is_enabled("WebcastRoomStatsMessage"));
    assert!(cfg.handlers.is_enabled("WebcastChatMessage"));
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.to_string(), "unsupported config version");
}

#[test]
fn out_of_range_values_fail() {
    for bad in [
        "version: 1\ndispatch:\n  workers: 0\n",
        "version: 1\ndispatch:\n  queue_capacity: 0\n",
        "version: 1\ndispatch:\n  task_timeout_ms: 0\n",
        "version: 1\nserver:\n  listen: \"not-an-addr\"\n",
        "version: 1\nserver:\n  max_batch: 0\n",
    ] {
        assert!(config::load_from_str(bad).is_err(), "accepted: {bad}");
    }
}

#[test]
fn disabling_unknown_method_fails() {
    let bad = "version: 1\nhandlers:\n  disabled: [\"WebcastSocialMessage\"]\n";
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("WebcastSocialMessage"));
}

#[test]
fn unknown_overflow_policy_fails() {
    let bad = "version: 1\ndispatch:\n  overflow: drop_everything\n";
    assert!(config::load_from_str(bad).is_err());
}
