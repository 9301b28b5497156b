//! Destination stores holding the normalized tables.
//!
//! The migration and the CRUD service only talk to the [`DestinationStore`] trait; the
//! rows they pass around are plain values, never bound to a connection.

mod base;
pub mod memory;
pub mod postgres;

pub use base::DestinationStore;
