//! Core logic for tasksmith: domain types, prompt construction, the
//! text-model trait seam, and the retrying plan-generation loop.
//!
//! This crate has no I/O of its own beyond `tokio::time::sleep`; the HTTP
//! client lives in `tasksmith-gemini` and the server in `tasksmith-cli`.

pub mod model;
pub mod plan;
