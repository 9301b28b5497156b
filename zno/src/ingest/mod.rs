//! Loading the raw open-data CSV export into the staging table.

mod reader;
mod staging;

use std::fmt;
use std::path::Path;

use tracing::info;
use zno_config::shared::IngestConfig;

use crate::error::ZnoResult;

pub use reader::{CsvReader, ParsedRecords};
pub use staging::StagingWriter;

/// Outcome of a staging load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_loaded: u64,
    /// Rows that could not be parsed and were left out.
    pub rows_skipped: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows loaded, {} rows skipped",
            self.rows_loaded, self.rows_skipped
        )
    }
}

/// Parses the CSV file at `path` and writes its records to staging in one transaction.
pub async fn load_file(
    path: &Path,
    config: &IngestConfig,
    writer: &StagingWriter,
) -> ZnoResult<LoadReport> {
    info!(path = %path.display(), "loading csv export into staging");

    let parsed = CsvReader::new(config)?.read_path(path)?;
    let rows_loaded = writer.write(&parsed.records).await?;

    let report = LoadReport {
        rows_loaded,
        rows_skipped: parsed.skipped,
    };
    info!(
        rows_loaded = report.rows_loaded,
        rows_skipped = report.rows_skipped,
        "staging load completed"
    );

    Ok(report)
}
