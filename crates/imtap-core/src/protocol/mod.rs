//! Protocol modules (ingestion envelope + webcast payload schemas).
//!
//! - Envelope: JSON items posted by the capture extension, unwrapped into
//!   `MessageEnvelope` by the transport.
//! - Webcast: protobuf payload schemas and the closed `DecodedMessage` set.
//!
//! Nothing here panics on hostile input: malformed bytes surface as
//! `ImTapError::Decode` through the decoder registry.

pub mod envelope;
pub mod message;
pub mod webcast;

pub use envelope::{MessageEnvelope, WireMessage};
pub use message::{method, DecodedMessage};
