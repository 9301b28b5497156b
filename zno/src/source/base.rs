use std::future::Future;

use crate::error::ZnoResult;
use crate::types::SourceRecord;

/// Exposes the flat dataset a migration reads from.
///
/// Every call performs a full scan and returns all records in a stable order, so each
/// migration phase sees the same sequence. Implementations never modify the records.
pub trait SourceReader {
    /// Returns every record of the dataset.
    fn read_records(&self) -> impl Future<Output = ZnoResult<Vec<SourceRecord>>> + Send;
}
