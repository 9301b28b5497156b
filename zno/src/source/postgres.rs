use sqlx::PgPool;
use tracing::debug;

use crate::error::{ErrorKind, ZnoResult};
use crate::source::SourceReader;
use crate::types::{SOURCE_COLUMNS, STAGING_TABLE, SourceRecord};
use crate::zno_error;

/// Reads the flat dataset from the staging table of the source database.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds the full-scan query; NULL staging values are read as empty strings.
fn select_records_query() -> String {
    let columns = SOURCE_COLUMNS
        .iter()
        .map(|column| format!("coalesce({column}, '') as {column}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!("select {columns} from {STAGING_TABLE} order by id")
}

impl SourceReader for PostgresSource {
    async fn read_records(&self) -> ZnoResult<Vec<SourceRecord>> {
        let query = select_records_query();
        let records = sqlx::query_as::<_, SourceRecord>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                zno_error!(
                    ErrorKind::SourceQueryFailed,
                    "Reading the staging table failed",
                    err,
                    source: err
                )
            })?;

        debug!(records = records.len(), "scanned staging table");

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_query_coalesces_every_column_in_order() {
        let query = select_records_query();

        assert!(query.starts_with("select coalesce(out_id, '') as out_id, "));
        assert!(query.ends_with("from ukr_source_records order by id"));
        assert_eq!(query.matches("coalesce(").count(), SOURCE_COLUMNS.len());
    }
}
