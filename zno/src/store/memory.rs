use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, ZnoResult};
use crate::store::DestinationStore;
use crate::types::{ColumnKind, Condition, ID_COLUMN, Record, SurrogateId, Table, Value};

#[derive(Debug, Default)]
struct TableData {
    rows: BTreeMap<SurrogateId, Vec<Value>>,
    /// Last id handed out; ids are never reused, as with a Postgres sequence.
    last_id: i64,
}

#[derive(Debug, Default)]
struct Inner {
    tables: BTreeMap<Table, TableData>,
}

impl Inner {
    fn contains(&self, table: Table, id: SurrogateId) -> bool {
        self.tables
            .get(&table)
            .is_some_and(|data| data.rows.contains_key(&id))
    }

    /// Checks a whole batch against the schema constraints before anything is written.
    fn check_rows(&self, table: Table, rows: &[Vec<Value>]) -> ZnoResult<()> {
        let columns = table.columns();
        let existing = self.tables.get(&table);

        for (position, column) in columns.iter().enumerate() {
            let mut seen = HashSet::new();

            for row in rows {
                if row.len() != columns.len() {
                    bail!(
                        ErrorKind::ValidationError,
                        "Row does not match the table schema",
                        format!(
                            "{table} has {} columns, the row has {} values",
                            columns.len(),
                            row.len()
                        )
                    );
                }

                let value = &row[position];

                if let ColumnKind::Reference(target) = column.kind {
                    match value {
                        Value::Null => {}
                        Value::Integer(id) if self.contains(target, SurrogateId::new(*id)) => {}
                        other => bail!(
                            ErrorKind::ConstraintViolation,
                            "Foreign key violation",
                            format!(
                                "{table}.{} = {other} is not present in {target}",
                                column.name
                            )
                        ),
                    }
                }

                if column.unique && *value != Value::Null {
                    let taken = existing.is_some_and(|data| {
                        data.rows.values().any(|stored| stored[position] == *value)
                    });
                    if taken || !seen.insert(value) {
                        bail!(
                            ErrorKind::ConstraintViolation,
                            "Unique constraint violation",
                            format!("{table}.{} = {value} already exists", column.name)
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the first table and column still referencing `id` of `table`.
    fn referenced_by(&self, table: Table, id: SurrogateId) -> Option<(Table, &'static str)> {
        let id = Value::from(id);

        self.tables.iter().find_map(|(referencing, data)| {
            referencing
                .columns()
                .iter()
                .enumerate()
                .filter(|(_, column)| column.kind == ColumnKind::Reference(table))
                .find(|(position, _)| data.rows.values().any(|row| row[*position] == id))
                .map(|(_, column)| (*referencing, column.name))
        })
    }
}

fn matches(table: Table, id: SurrogateId, values: &[Value], conditions: &[Condition]) -> bool {
    conditions.iter().all(|condition| {
        if condition.column == ID_COLUMN {
            return condition.value == Value::from(id);
        }

        table
            .column(condition.column)
            .is_some_and(|(position, _)| values[position] == condition.value)
    })
}

/// In-memory destination store.
///
/// Enforces the same constraints as the Postgres schema (unique `out_id`, existing
/// reference targets, restricted deletes) and applies batches atomically, which makes it
/// a faithful stand-in for tests and dry runs. Data is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DestinationStore for MemoryStore {
    async fn insert_rows(
        &self,
        table: Table,
        rows: Vec<Vec<Value>>,
    ) -> ZnoResult<Vec<SurrogateId>> {
        let mut inner = self.inner.lock().await;

        inner.check_rows(table, &rows)?;

        let data = inner.tables.entry(table).or_default();
        let ids = rows
            .into_iter()
            .map(|values| {
                data.last_id += 1;
                let id = SurrogateId::new(data.last_id);
                data.rows.insert(id, values);
                id
            })
            .collect::<Vec<_>>();

        debug!(%table, rows = ids.len(), "inserted rows into memory store");

        Ok(ids)
    }

    async fn select_rows(&self, table: Table, conditions: &[Condition]) -> ZnoResult<Vec<Record>> {
        for condition in conditions {
            if condition.column != ID_COLUMN && table.column(condition.column).is_none() {
                bail!(
                    ErrorKind::ValidationError,
                    "Unknown column in filter",
                    format!("{table} has no column {}", condition.column)
                );
            }
        }

        let inner = self.inner.lock().await;
        let Some(data) = inner.tables.get(&table) else {
            return Ok(Vec::new());
        };

        Ok(data
            .rows
            .iter()
            .filter(|(id, values)| matches(table, **id, values, conditions))
            .map(|(id, values)| Record {
                id: *id,
                values: values.clone(),
            })
            .collect())
    }

    async fn row_exists(&self, table: Table, id: SurrogateId) -> ZnoResult<bool> {
        let inner = self.inner.lock().await;

        Ok(inner.contains(table, id))
    }

    async fn count_rows(&self, table: Table) -> ZnoResult<u64> {
        let inner = self.inner.lock().await;

        Ok(inner
            .tables
            .get(&table)
            .map_or(0, |data| data.rows.len() as u64))
    }

    async fn delete_row(&self, table: Table, id: SurrogateId) -> ZnoResult<bool> {
        let mut inner = self.inner.lock().await;

        if !inner.contains(table, id) {
            return Ok(false);
        }

        if let Some((referencing, column)) = inner.referenced_by(table, id) {
            bail!(
                ErrorKind::ConstraintViolation,
                "Row is still referenced",
                format!("{table}.id = {id} is referenced from {referencing}.{column}")
            );
        }

        if let Some(data) = inner.tables.get_mut(&table) {
            data.rows.remove(&id);
        }

        Ok(true)
    }

    async fn participant_ids(&self) -> ZnoResult<Vec<(String, SurrogateId)>> {
        let inner = self.inner.lock().await;
        let Some(data) = inner.tables.get(&Table::Participants) else {
            return Ok(Vec::new());
        };

        Ok(data
            .rows
            .iter()
            .map(|(id, values)| {
                let out_id = values[0].as_text().unwrap_or_default().to_owned();
                (out_id, *id)
            })
            .collect())
    }
}
