//! imtap: decode and dispatch captured live-stream messages.
//!
//! Single-dependency entry point. `core` holds the wire schemas, the decoder
//! registry and the error surface; `gateway` holds the dispatch engine, the
//! built-in handlers and the HTTP ingestion service. Embedders usually only
//! need the [`prelude`].

pub use imtap_core as core;
pub use imtap_gateway as gateway;

pub mod prelude {
    pub use imtap_core::protocol::{method, DecodedMessage, MessageEnvelope, WireMessage};
    pub use imtap_core::{DecoderRegistry, FailureKind, ImTapError, Result};
    pub use imtap_gateway::app_state::AppState;
    pub use imtap_gateway::config::TapConfig;
    pub use imtap_gateway::dispatch::{DispatchEngine, Handler, HandlerRegistry};
    pub use imtap_gateway::report::{ChannelSink, EventSink, Failure, LiveEvent, Report};
}
