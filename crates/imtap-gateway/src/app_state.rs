//! Shared application state for the imtap gateway.
//!
//! Builds the registries exactly once, starts the dispatch engine, and hands
//! out cheap clones to the HTTP layer. Startup errors (duplicate handlers,
//! handlers without decoders) are returned, not panicked.

use std::sync::Arc;
use std::time::Duration;

use imtap_core::error::Result;
use imtap_core::DecoderRegistry;

use crate::config::TapConfig;
use crate::dispatch::{DispatchEngine, EngineState, Handler, HandlerRegistry};
use crate::handlers;
use crate::obs::TapMetrics;
use crate::producer::{DetachedProducer, Producer};
use crate::report::{EventSink, TracingSink};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    engine: Arc<DispatchEngine>,
    metrics: Arc<TapMetrics>,
    producer: Arc<dyn Producer>,
}

struct AppStateInner {
    cfg: TapConfig,
}

impl AppState {
    /// Build with the default tracing sink. Must run inside a tokio runtime.
    pub fn new(cfg: TapConfig) -> Result<Self> {
        Self::with_sink(cfg, Arc::new(TracingSink))
    }

    pub fn with_sink(cfg: TapConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let decoders = Arc::new(DecoderRegistry::webcast());

        let enabled: Vec<Handler> = handlers::builtin()
            .into_iter()
            .filter(|h| cfg.handlers.is_enabled(h.method()))
            .collect();
        for m in &cfg.handlers.disabled {
            tracing::info!(method = %m, "handler disabled by config");
        }
        let handlers = Arc::new(HandlerRegistry::build(enabled, &decoders)?);

        let metrics = Arc::new(TapMetrics::new());
        let engine = Arc::new(DispatchEngine::start(
            &cfg.dispatch,
            decoders,
            handlers,
            sink,
            Arc::clone(&metrics),
        ));

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            engine,
            metrics,
            producer: Arc::new(DetachedProducer),
        })
    }

    /// Replace the capture-session collaborator.
    pub fn with_producer(mut self, producer: Arc<dyn Producer>) -> Self {
        self.producer = producer;
        self
    }

    pub fn cfg(&self) -> &TapConfig {
        &self.inner.cfg
    }

    pub fn engine(&self) -> Arc<DispatchEngine> {
        Arc::clone(&self.engine)
    }

    pub fn metrics(&self) -> Arc<TapMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn producer(&self) -> Arc<dyn Producer> {
        Arc::clone(&self.producer)
    }

    pub fn is_draining(&self) -> bool {
        self.engine.state() != EngineState::Running
    }

    /// Gauges computed at scrape time.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("imtap_dispatch_queue_depth", self.engine.queue_depth() as u64),
            ("imtap_draining", u64::from(self.is_draining())),
        ]
    }

    /// Drain the dispatch engine within `dispatch.drain_timeout_ms`.
    pub async fn shutdown(&self) -> Result<()> {
        let budget = Duration::from_millis(self.cfg().dispatch.drain_timeout_ms);
        self.engine.drain(budget).await
    }
}
