//! The normalization core.
//!
//! A run materializes the independent lookup tables first, each deduplicated through a
//! [`DeduplicationIndex`], then links participants and test results to the committed
//! lookups through a [`ReferenceResolver`]. Every phase is committed atomically by the
//! [`BatchCommitter`] before any dependent phase starts.

mod committer;
mod dedup;
mod linker;
mod materializer;
mod phase;
mod resolver;

pub use committer::BatchCommitter;
pub use dedup::{DeduplicationIndex, Indexed, LookupIndexes};
pub use linker::{FactLinker, Linked};
pub use materializer::EntityMaterializer;
pub use phase::{Phase, PhaseReport};
pub use resolver::{ParticipantIndex, ReferenceResolver};
