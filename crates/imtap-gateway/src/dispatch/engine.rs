//! Dispatch engine: bounded queue + fixed worker set.
//!
//! `submit` resolves the handler up front (unknown methods are dropped before
//! they take a queue slot) and enqueues without waiting on decode/handle.
//! Workers pull from the shared queue, run decode + handle on the blocking pool
//! under a per-task timeout, and report the outcome to the sink. Nothing that
//! happens on a worker reaches the submitter.
//!
//! Lifecycle: `start` -> (`drain` | `stop`). Dropping the engine closes the
//! queue; workers finish what is queued and exit.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::Instrument;

use imtap_core::error::{ImTapError, Result};
use imtap_core::protocol::MessageEnvelope;
use imtap_core::{DecoderRegistry, FailureKind};

use crate::config::{DispatchSection, OverflowPolicy};
use crate::dispatch::registry::{Handler, HandlerRegistry};
use crate::obs::metrics::{method_label, TapMetrics};
use crate::report::{EventSink, Failure, LiveEvent, Report};

const RUNNING: u8 = 0;
const DRAINING: u8 = 1;
const STOPPED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Draining,
    Stopped,
}

/// Queued unit of work: the envelope plus its already-resolved handler.
struct Job {
    env: MessageEnvelope,
    handler: Handler,
}

/// Shared, read-only state of every worker.
struct WorkerCtx {
    decoders: Arc<DecoderRegistry>,
    handlers: Arc<HandlerRegistry>,
    sink: Arc<dyn EventSink>,
    metrics: Arc<TapMetrics>,
    task_timeout: Duration,
}

pub struct DispatchEngine {
    tx: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    state: AtomicU8,
    overflow: OverflowPolicy,
    submit_timeout: Duration,
    ctx: Arc<WorkerCtx>,
}

impl DispatchEngine {
    /// Spawn the worker set. Must be called from within a tokio runtime.
    pub fn start(
        cfg: &DispatchSection,
        decoders: Arc<DecoderRegistry>,
        handlers: Arc<HandlerRegistry>,
        sink: Arc<dyn EventSink>,
        metrics: Arc<TapMetrics>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<Job>(cfg.queue_capacity.max(1));
        let rx = Arc::new(AsyncMutex::new(rx));

        let ctx = Arc::new(WorkerCtx {
            decoders,
            handlers,
            sink,
            metrics,
            task_timeout: Duration::from_millis(cfg.task_timeout_ms),
        });

        let workers = (0..cfg.workers.max(1))
            .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&rx), Arc::clone(&ctx))))
            .collect();

        tracing::info!(
            workers = cfg.workers,
            queue_capacity = cfg.queue_capacity,
            overflow = ?cfg.overflow,
            handlers = ?ctx.handlers.methods(),
            "dispatch engine started"
        );

        Self {
            tx: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            state: AtomicU8::new(RUNNING),
            overflow: cfg.overflow,
            submit_timeout: Duration::from_millis(cfg.submit_timeout_ms),
            ctx,
        }
    }

    pub fn state(&self) -> EngineState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => EngineState::Running,
            DRAINING => EngineState::Draining,
            _ => EngineState::Stopped,
        }
    }

    /// Envelopes waiting for a worker.
    pub fn queue_depth(&self) -> usize {
        self.sender()
            .map(|tx| tx.max_capacity() - tx.capacity())
            .unwrap_or(0)
    }

    /// Hand an envelope to the pool.
    ///
    /// Methods without a handler are dropped silently (`Ok`). An error means
    /// the envelope was not queued (queue full, engine draining or stopped);
    /// it has already been counted and reported, callers only use it for
    /// bookkeeping.
    pub async fn submit(&self, env: MessageEnvelope) -> Result<()> {
        let Some(handler) = self.ctx.handlers.resolve(env.method()) else {
            tracing::trace!(method = %env.method(), "no handler registered, dropping");
            self.ctx.metrics.failures.inc(&[
                ("kind", FailureKind::UnknownType.as_str()),
                ("method", method_label(env.method())),
            ]);
            return Ok(());
        };

        let Some(tx) = self.sender() else {
            return self.refuse(env.method()).await;
        };

        let job = Job { env, handler };
        let rejected = match self.overflow {
            OverflowPolicy::Reject => match tx.try_send(job) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(job)) => job,
                Err(TrySendError::Closed(job)) => return self.refuse(job.env.method()).await,
            },
            OverflowPolicy::Block => match tx.send_timeout(job, self.submit_timeout).await {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(job)) => job,
                Err(SendTimeoutError::Closed(job)) => return self.refuse(job.env.method()).await,
            },
        };

        self.report_failure(
            FailureKind::Overloaded,
            rejected.env.method(),
            "dispatch queue full",
        )
        .await;
        Err(ImTapError::Overloaded)
    }

    /// Envelope arrived after `drain`/`stop`.
    async fn refuse(&self, method: &str) -> Result<()> {
        const NOT_ACCEPTING: &str = "dispatch engine is not accepting envelopes";
        self.report_failure(FailureKind::Internal, method, NOT_ACCEPTING).await;
        Err(ImTapError::Internal(NOT_ACCEPTING.into()))
    }

    /// Count and report a dropped envelope (also used by the transport).
    pub async fn report_failure(&self, kind: FailureKind, method: &str, detail: impl Into<String>) {
        self.ctx.fail(kind, method, detail).await;
    }

    /// Stop accepting, let workers finish the queue, wait up to `budget`.
    ///
    /// Workers still busy when the budget runs out are aborted and
    /// `ImTapError::Timeout` is returned. Calling it again is a no-op.
    pub async fn drain(&self, budget: Duration) -> Result<()> {
        if self
            .state
            .compare_exchange(RUNNING, DRAINING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        self.close_queue();
        let mut handles = self.take_workers();

        let res = timeout(budget, join_all(handles.iter_mut())).await;

        match res {
            Ok(_) => {
                self.state.store(STOPPED, Ordering::Release);
                tracing::info!("dispatch engine drained");
                Ok(())
            }
            Err(_) => {
                for h in &handles {
                    h.abort();
                }
                // Cancelled workers unwind promptly; their in-flight guards
                // report the abandoned envelopes.
                join_all(handles.into_iter().filter(|h| !h.is_finished())).await;
                self.state.store(STOPPED, Ordering::Release);
                tracing::warn!(
                    budget_ms = budget.as_millis() as u64,
                    "drain budget exceeded, workers aborted"
                );
                Err(ImTapError::Timeout("dispatch drain budget exceeded".into()))
            }
        }
    }

    /// Abort workers immediately; queued envelopes are discarded.
    pub fn stop(&self) {
        self.state.store(STOPPED, Ordering::Release);
        self.close_queue();
        for h in self.take_workers() {
            h.abort();
        }
    }

    fn sender(&self) -> Option<mpsc::Sender<Job>> {
        if self.state.load(Ordering::Acquire) != RUNNING {
            return None;
        }
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn close_queue(&self) {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    fn take_workers(&self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

async fn worker_loop(id: usize, rx: Arc<AsyncMutex<mpsc::Receiver<Job>>>, ctx: Arc<WorkerCtx>) {
    loop {
        let next = rx.lock().await.recv().await;
        let Some(job) = next else { break };
        let span = tracing::debug_span!("dispatch", worker = id, method = job.handler.method());
        ctx.process(job).instrument(span).await;
    }
    tracing::debug!(worker = id, "dispatch worker exited");
}

/// Decode then handle. `Ok(None)`: the handler's method has no decoder.
fn decode_and_handle(decoders: &DecoderRegistry, handler: Handler, env: &MessageEnvelope) -> Result<Option<LiveEvent>> {
    let Some(msg) = decoders.decode(env.method(), env.payload())? else {
        return Ok(None);
    };
    handler.handle(&msg).map(Some)
}

impl WorkerCtx {
    async fn process(&self, job: Job) {
        let Job { env, handler } = job;
        let method = handler.method();

        if let Some(ts) = env.captured_at_ms() {
            tracing::trace!(capture_ts = ts, len = env.payload().len(), "processing");
        }

        let decoders = Arc::clone(&self.decoders);
        let started = Instant::now();
        let guard = InFlight::enter(self, method);

        // Blocking pool: decode is CPU-bound, and a panicking or hung handler
        // must not take the worker with it.
        let task = tokio::task::spawn_blocking(move || decode_and_handle(&decoders, handler, &env));
        let outcome = match timeout(self.task_timeout, task).await {
            Ok(Ok(res)) => res,
            Ok(Err(e)) if e.is_panic() => Err(ImTapError::handler(method, "handler panicked")),
            Ok(Err(_)) => Err(ImTapError::Internal("dispatch task cancelled".into())),
            Err(_) => Err(ImTapError::Timeout(format!(
                "decode+handle exceeded {}ms",
                self.task_timeout.as_millis()
            ))),
        };

        guard.finish();
        self.metrics
            .handle_duration
            .observe(&[("method", method)], started.elapsed());

        match outcome {
            Ok(Some(event)) => {
                self.metrics.handled.inc(&[("method", method)]);
                self.sink.emit(Report::Event(event)).await;
            }
            Ok(None) => {
                self.fail(FailureKind::UnknownType, method, "handler registered without decoder")
                    .await;
            }
            Err(e) => self.fail(e.kind(), method, e.to_string()).await,
        }
    }

    async fn fail(&self, kind: FailureKind, method: &str, detail: impl Into<String>) {
        self.metrics
            .failures
            .inc(&[("kind", kind.as_str()), ("method", method_label(method))]);
        self.sink
            .emit(Report::Failure(Failure::new(kind, method, detail)))
            .await;
    }
}

/// One envelope between dequeue and outcome, tracked by `in_flight`.
///
/// Dropped without `finish` only when its worker is aborted (drain budget
/// exceeded); the envelope is then counted and reported as `TIMEOUT`.
struct InFlight {
    metrics: Arc<TapMetrics>,
    sink: Arc<dyn EventSink>,
    method: &'static str,
    finished: bool,
}

impl InFlight {
    fn enter(ctx: &WorkerCtx, method: &'static str) -> Self {
        ctx.metrics.in_flight.inc();
        Self {
            metrics: Arc::clone(&ctx.metrics),
            sink: Arc::clone(&ctx.sink),
            method,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.metrics.in_flight.dec();
        if self.finished {
            return;
        }

        let kind = FailureKind::Timeout;
        self.metrics
            .failures
            .inc(&[("kind", kind.as_str()), ("method", method_label(self.method))]);
        tracing::warn!(method = self.method, "in-flight envelope abandoned at shutdown");

        // Drop cannot await; hand the report to the runtime if one is still up.
        if let Ok(rt) = tokio::runtime::Handle::try_current() {
            let sink = Arc::clone(&self.sink);
            let failure = Failure::new(kind, self.method, "abandoned when the drain budget ran out");
            rt.spawn(async move { sink.emit(Report::Failure(failure)).await });
        }
    }
}
