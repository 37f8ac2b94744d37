use async_trait::async_trait;
use tokio::sync::mpsc;

use super::event::{LiveEvent, Report};

/// Destination for everything the pipeline reports. Must not fail: a sink that
/// cannot deliver drops the report.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, report: Report);
}

/// Default sink: one structured log line per report.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn emit(&self, report: Report) {
        match report {
            Report::Event(ev) => log_event(&ev),
            Report::Failure(f) => {
                tracing::warn!(
                    kind = f.kind.as_str(),
                    method = %f.method,
                    detail = %f.detail,
                    "envelope dropped"
                );
            }
        }
    }
}

/// Short tag used as the log message, one per event kind.
fn tag(ev: &LiveEvent) -> &'static str {
    match ev {
        LiveEvent::Chat { .. } => "[chat]",
        LiveEvent::Gift { .. } => "[gift]",
        LiveEvent::Member { .. } => "[enter]",
        LiveEvent::Like { .. } => "[like]",
        LiveEvent::RoomStats { .. } => "[room-stats]",
        LiveEvent::RankEntrance { .. } => "[rank-entrance]",
    }
}

/// One line per event; the whole event goes out as a JSON field.
fn log_event(ev: &LiveEvent) {
    let event = match serde_json::to_string(ev) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(method = ev.method(), error = %e, "event not serializable");
            return;
        }
    };
    if let LiveEvent::RankEntrance { .. } = ev {
        tracing::debug!(method = ev.method(), %event, "{}", tag(ev));
    } else {
        tracing::info!(method = ev.method(), %event, "{}", tag(ev));
    }
}

/// Forwards reports into a bounded channel (embedding, tests).
///
/// Waits for capacity; once the receiver is gone reports are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Report>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Report>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, report: Report) {
        let _ = self.tx.send(report).await;
    }
}
