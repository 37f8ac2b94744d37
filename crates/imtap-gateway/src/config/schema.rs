use std::net::SocketAddr;

use serde::Deserialize;
use imtap_core::error::{ImTapError, Result};
use imtap_core::protocol::method;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TapConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub dispatch: DispatchSection,

    #[serde(default)]
    pub handlers: HandlersSection,
}

impl TapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ImTapError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.dispatch.validate()?;
        self.handlers.validate()?;
        Ok(())
    }
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            dispatch: DispatchSection::default(),
            handlers: HandlersSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Items accepted per ingestion request; the rest are dropped.
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_batch: default_max_batch(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1..=100_000).contains(&self.max_batch) {
            return Err(ImTapError::Config(
                "server.max_batch must be between 1 and 100000".into(),
            ));
        }
        if !(1024..=64 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(ImTapError::Config(
                "server.max_body_bytes must be between 1KiB and 64MiB".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ImTapError::Config(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    // the capture extension posts to 127.0.0.1:8080
    "127.0.0.1:8080".into()
}
fn default_max_batch() -> usize {
    1000
}
fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}

/// What `submit` does when the dispatch queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the incoming envelope immediately.
    #[default]
    Reject,
    /// Wait up to `submit_timeout_ms` for room, then drop.
    Block,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub overflow: OverflowPolicy,

    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,

    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,

    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            overflow: OverflowPolicy::default(),
            submit_timeout_ms: default_submit_timeout_ms(),
            task_timeout_ms: default_task_timeout_ms(),
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }
}

impl DispatchSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.workers) {
            return Err(ImTapError::Config(
                "dispatch.workers must be between 1 and 256".into(),
            ));
        }
        if !(1..=1_000_000).contains(&self.queue_capacity) {
            return Err(ImTapError::Config(
                "dispatch.queue_capacity must be between 1 and 1000000".into(),
            ));
        }
        if !(1..=10_000).contains(&self.submit_timeout_ms) {
            return Err(ImTapError::Config(
                "dispatch.submit_timeout_ms must be between 1 and 10000".into(),
            ));
        }
        if !(1..=600_000).contains(&self.task_timeout_ms) {
            return Err(ImTapError::Config(
                "dispatch.task_timeout_ms must be between 1 and 600000".into(),
            ));
        }
        if self.drain_timeout_ms > 600_000 {
            return Err(ImTapError::Config(
                "dispatch.drain_timeout_ms must be at most 600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    4
}
fn default_queue_capacity() -> usize {
    1024
}
fn default_submit_timeout_ms() -> u64 {
    50
}
fn default_task_timeout_ms() -> u64 {
    5000
}
fn default_drain_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlersSection {
    /// Methods whose built-in handler is not registered.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl HandlersSection {
    pub fn validate(&self) -> Result<()> {
        for m in &self.disabled {
            if !method::ALL.contains(&m.as_str()) {
                return Err(ImTapError::Config(format!(
                    "handlers.disabled refers to unknown method: {m}"
                )));
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, m: &str) -> bool {
        !self.disabled.iter().any(|d| d == m)
    }
}
