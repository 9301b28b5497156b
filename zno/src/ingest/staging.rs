use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::error::ZnoResult;
use crate::types::{SOURCE_COLUMNS, STAGING_TABLE, SourceRecord};

/// Rows per insert statement; 25 binds per row stays well under the Postgres bind limit.
const INSERT_CHUNK_SIZE: usize = 1000;

fn insert_records_builder(records: &[SourceRecord]) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "insert into {STAGING_TABLE} ({}) ",
        SOURCE_COLUMNS.join(", ")
    ));
    builder.push_values(records, |mut separated, record| {
        for field in record.fields() {
            separated.push_bind(field);
        }
    });

    builder
}

/// Writes parsed records to the staging table of the source database.
#[derive(Debug, Clone)]
pub struct StagingWriter {
    pool: PgPool,
}

impl StagingWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts every record in one transaction and returns the number of rows written.
    pub async fn write(&self, records: &[SourceRecord]) -> ZnoResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let result = insert_records_builder(chunk)
                .build()
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected();

            debug!(rows = chunk.len(), "inserted staging chunk");
        }

        tx.commit().await?;

        Ok(written)
    }
}
