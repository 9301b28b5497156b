use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;
use zno_config::shared::{IntoConnectOptions, PgConnectionConfig};

use crate::error::ZnoResult;
use crate::store::DestinationStore;
use crate::types::{ColumnKind, Condition, ID_COLUMN, Record, SurrogateId, Table, Value};

/// Duration after which idle connections are closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates a lazily connected pool; connections are opened on first use.
pub fn create_database_pool(config: &PgConnectionConfig, max_connections: u32) -> PgPool {
    PgPoolOptions::new()
        .min_connections(0)
        .max_connections(max_connections)
        .idle_timeout(Some(IDLE_TIMEOUT))
        .connect_lazy_with(config.with_db())
}

/// Binds a value to the next separated position.
fn push_value(separated: &mut Separated<'_, '_, Postgres, &'static str>, value: Value) {
    match value {
        Value::Null => {
            separated.push("null");
        }
        Value::Text(text) => {
            separated.push_bind(text);
        }
        Value::Integer(integer) => {
            separated.push_bind(integer);
        }
    }
}

fn push_columns(builder: &mut QueryBuilder<'_, Postgres>, table: Table) {
    let mut separated = builder.separated(", ");
    for column in table.columns() {
        separated.push(column.name);
    }
}

/// Builds an exact-match conjunction; column names come from the static schema only.
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, conditions: &[Condition]) {
    if conditions.is_empty() {
        return;
    }

    builder.push(" where ");
    let mut separated = builder.separated(" and ");
    for condition in conditions {
        separated.push(condition.column);
        match &condition.value {
            Value::Null => {
                separated.push_unseparated(" is null");
            }
            Value::Text(text) => {
                separated.push_unseparated(" = ");
                separated.push_bind_unseparated(text.clone());
            }
            Value::Integer(integer) => {
                separated.push_unseparated(" = ");
                separated.push_bind_unseparated(*integer);
            }
        }
    }
}

fn decode_record(table: Table, row: &PgRow) -> ZnoResult<Record> {
    let id: i64 = row.try_get(ID_COLUMN)?;
    let mut values = Vec::with_capacity(table.columns().len());

    for column in table.columns() {
        let value = match column.kind {
            ColumnKind::Text => row
                .try_get::<Option<String>, _>(column.name)?
                .map_or(Value::Null, Value::Text),
            ColumnKind::Reference(_) => row
                .try_get::<Option<i64>, _>(column.name)?
                .map_or(Value::Null, Value::Integer),
        };
        values.push(value);
    }

    Ok(Record {
        id: SurrogateId::new(id),
        values,
    })
}

/// Postgres-backed destination store.
///
/// Every batch runs in one transaction, so a failing row rolls back the whole batch.
/// Constraints are the ones declared by the destination migrations.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DestinationStore for PostgresStore {
    async fn insert_rows(
        &self,
        table: Table,
        rows: Vec<Vec<Value>>,
    ) -> ZnoResult<Vec<SurrogateId>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(rows.len());

        // One statement per row keeps `returning id` aligned with the input order.
        for row in rows {
            let mut builder = QueryBuilder::<Postgres>::new("insert into ");
            builder.push(table.name()).push(" (");
            push_columns(&mut builder, table);
            builder.push(") values (");
            {
                let mut separated = builder.separated(", ");
                for value in row {
                    push_value(&mut separated, value);
                }
            }
            builder.push(") returning id");

            let id: i64 = builder.build_query_scalar().fetch_one(&mut *tx).await?;
            ids.push(SurrogateId::new(id));
        }

        tx.commit().await?;

        debug!(%table, rows = ids.len(), "inserted rows into postgres");

        Ok(ids)
    }

    async fn select_rows(&self, table: Table, conditions: &[Condition]) -> ZnoResult<Vec<Record>> {
        let mut builder = QueryBuilder::<Postgres>::new("select id, ");
        push_columns(&mut builder, table);
        builder.push(" from ").push(table.name());
        push_conditions(&mut builder, conditions);
        builder.push(" order by id asc");

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter().map(|row| decode_record(table, row)).collect()
    }

    async fn row_exists(&self, table: Table, id: SurrogateId) -> ZnoResult<bool> {
        let name = table.name();
        let query = format!("select exists(select 1 from {name} where id = $1)");
        let exists = sqlx::query_scalar(&query)
            .bind(id.into_inner())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn count_rows(&self, table: Table) -> ZnoResult<u64> {
        let query = format!("select count(*) from {}", table.name());
        let count: i64 = sqlx::query_scalar(&query).fetch_one(&self.pool).await?;

        Ok(count as u64)
    }

    async fn delete_row(&self, table: Table, id: SurrogateId) -> ZnoResult<bool> {
        let query = format!("delete from {} where id = $1", table.name());
        let result = sqlx::query(&query)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn participant_ids(&self) -> ZnoResult<Vec<(String, SurrogateId)>> {
        let rows: Vec<(Option<String>, i64)> =
            sqlx::query_as("select out_id, id from participants order by id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(out_id, id)| (out_id.unwrap_or_default(), SurrogateId::new(id)))
            .collect())
    }
}
