//! Dispatch: handler registry and the worker-pool engine.
//!
//! Re-exports the registry and engine so downstream consumers can depend on
//! this module directly.

pub mod engine;
pub mod registry;

pub use engine::{DispatchEngine, EngineState};
pub use registry::{HandleFn, Handler, HandlerRegistry};
