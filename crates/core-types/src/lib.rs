//! # Margin Core Types
//!
//! Layer 0 of the workspace. Defines the validated `Record` that every other crate
//! consumes, and the in-memory `RecordBook` the dashboard edits.
//!
//! Validation happens here, at ingestion: a `Record` with a negative or oversized
//! amount or an unparseable date cannot be constructed or deserialized. Downstream crates can
//! therefore assume their input is valid.

pub mod book;
pub mod error;
pub mod record;

// Re-export the core types to provide a clean public API.
pub use book::RecordBook;
pub use error::CoreError;
pub use record::{MAX_AMOUNT, RawRecord, Record};
