//! imtap core: payload schemas, the decoder registry, and the shared error type.
//!
//! This crate owns everything that is independent of how envelopes reach the
//! process: the webcast protobuf schemas, the closed `DecodedMessage` set, the
//! method -> decoder table, and the error surface shared with the gateway. It
//! carries no runtime or transport dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Every fallible path returns `ImTapError`, so a malformed payload can never
//! take a worker down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod decoder;
pub mod error;
pub mod protocol;

pub use decoder::DecoderRegistry;
/// Shared result type.
pub use error::{FailureKind, ImTapError, Result};
