//! Readers exposing the flat dataset as a sequence of [`crate::types::SourceRecord`]s.

mod base;
pub mod memory;
pub mod postgres;

pub use base::SourceReader;
