//! Transport layer (HTTP ingestion).
//!
//! Exposes the batch endpoint and the codec that unwraps each item once before
//! it reaches the dispatch engine.

pub mod codec;
pub mod ingest;
