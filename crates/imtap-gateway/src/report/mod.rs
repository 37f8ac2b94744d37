//! Reporting surface of the pipeline.
//!
//! Handlers turn decoded messages into `LiveEvent`s; the dispatch engine wraps
//! events and dropped-envelope `Failure`s into `Report`s and hands them to an
//! `EventSink`. The default sink logs through `tracing`.

pub mod event;
pub mod sink;

pub use event::{Failure, LiveEvent, Report};
pub use sink::{ChannelSink, EventSink, TracingSink};
