//! In-process pipeline metrics.
//!
//! Counters for received, handled, and dropped envelopes plus a latency
//! histogram, stored as atomics and rendered by the `/metrics` handler.

pub mod metrics;

pub use metrics::TapMetrics;
