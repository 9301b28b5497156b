//! Normalization of the flat ZNO registration export into a relational schema.
//!
//! A [`pipeline::Migration`] reads every [`types::SourceRecord`] from a
//! [`source::SourceReader`] and writes deduplicated lookups, participants and test results to
//! a [`store::DestinationStore`]. The [`crud`] module maintains the resulting tables record by
//! record, and [`ingest`] loads the raw CSV export into the staging table read by the
//! Postgres source.

mod macros;

pub mod concurrency;
pub mod crud;
pub mod error;
pub mod ingest;
pub mod migrations;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
