use std::sync::Arc;

use crate::error::ZnoResult;
use crate::source::SourceReader;
use crate::types::SourceRecord;

/// In-memory dataset, used by tests and by dry runs over a CSV file.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Arc<Vec<SourceRecord>>,
}

impl MemorySource {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

impl SourceReader for MemorySource {
    async fn read_records(&self) -> ZnoResult<Vec<SourceRecord>> {
        Ok(self.records.as_ref().clone())
    }
}
