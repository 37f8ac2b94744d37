//! imtap gateway library entry.
//!
//! This crate wires the HTTP transport, the handler registry, the dispatch
//! engine, and the built-in handlers into a running ingestion service. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod producer;
pub mod report;
pub mod router;
pub mod transport;
