use std::collections::BTreeMap;

use tracing::info;

use crate::bail;
use crate::crud::{DeleteOutcome, InsertOutcome, InsertRejection};
use crate::error::{ErrorKind, ZnoResult};
use crate::store::DestinationStore;
use crate::types::{ColumnKind, Condition, ID_COLUMN, Record, SurrogateId, Table, Value};

/// Parses a reference the way the console accepts it: ASCII digits only.
fn parse_reference(value: &str) -> Option<i64> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    value.parse().ok()
}

/// Single-scope access to the destination for interactive maintenance.
#[derive(Debug, Clone)]
pub struct CrudService<S> {
    store: S,
}

impl<S> CrudService<S>
where
    S: DestinationStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns rows of `table` matching every non-empty filter, ordered by id.
    ///
    /// Empty values are ignored, so an all-empty filter returns the whole table. Filters on
    /// `id` and reference columns must be integers.
    pub async fn query(
        &self,
        table: Table,
        filters: &BTreeMap<String, String>,
    ) -> ZnoResult<Vec<Record>> {
        let mut conditions = Vec::new();

        for (field, value) in filters.iter().filter(|(_, value)| !value.is_empty()) {
            let (column, integer) = if field == ID_COLUMN {
                (ID_COLUMN, true)
            } else {
                match table.column(field) {
                    Some((_, column)) => {
                        (column.name, matches!(column.kind, ColumnKind::Reference(_)))
                    }
                    None => bail!(
                        ErrorKind::ValidationError,
                        "Unknown column in filter",
                        format!("{table} has no column {field}")
                    ),
                }
            };

            let value = if integer {
                match value.parse::<i64>() {
                    Ok(id) => Value::Integer(id),
                    Err(_) => bail!(
                        ErrorKind::ValidationError,
                        "Filter value must be an integer",
                        format!("{column} = {value:?}")
                    ),
                }
            } else {
                Value::Text(value.clone())
            };

            conditions.push(Condition::new(column, value));
        }

        self.store.select_rows(table, &conditions).await
    }

    /// Validates and inserts one row.
    ///
    /// Columns missing from `fields` are stored as empty text. A rejection leaves the table
    /// untouched; a store failure after validation rolls the single insert back.
    pub async fn insert(
        &self,
        table: Table,
        fields: &BTreeMap<String, String>,
    ) -> ZnoResult<InsertOutcome> {
        if let Some(column) = fields.keys().find(|field| table.column(field).is_none()) {
            return Ok(InsertOutcome::Rejected(InsertRejection::UnknownColumn {
                table,
                column: column.clone(),
            }));
        }

        let field = |name: &str| fields.get(name).map(String::as_str).unwrap_or_default();

        for column in table.columns().iter().filter(|column| column.unique) {
            let value = field(column.name);
            let taken = self
                .store
                .select_rows(table, &[Condition::new(column.name, value)])
                .await?;
            if !taken.is_empty() {
                return Ok(InsertOutcome::Rejected(InsertRejection::DuplicateOutId(
                    value.to_string(),
                )));
            }
        }

        let mut values = Vec::with_capacity(table.columns().len());
        for column in table.columns() {
            let raw = field(column.name);

            let value = match column.kind {
                ColumnKind::Text => Value::from(raw),
                ColumnKind::Reference(target) => {
                    let Some(id) = parse_reference(raw) else {
                        return Ok(InsertOutcome::Rejected(InsertRejection::NonNumericReference {
                            column: column.name,
                            value: raw.to_string(),
                        }));
                    };

                    let id = SurrogateId::new(id);
                    if !self.store.row_exists(target, id).await? {
                        return Ok(InsertOutcome::Rejected(InsertRejection::MissingReference {
                            column: column.name,
                            id,
                            target,
                        }));
                    }

                    Value::from(id)
                }
            };
            values.push(value);
        }

        let ids = self.store.insert_rows(table, vec![values]).await?;
        let Some(id) = ids.first().copied() else {
            bail!(
                ErrorKind::InvalidState,
                "Store returned no id for the inserted row",
                table
            );
        };

        info!(%table, %id, "record added");

        Ok(InsertOutcome::Inserted(id))
    }

    /// Deletes the row with `id`, reporting [`DeleteOutcome::NotFound`] when there is none.
    pub async fn delete(&self, table: Table, id: &str) -> ZnoResult<DeleteOutcome> {
        let Ok(id) = id.trim().parse::<i64>() else {
            return Ok(DeleteOutcome::NotFound);
        };
        let id = SurrogateId::new(id);

        if !self.store.delete_row(table, id).await? {
            return Ok(DeleteOutcome::NotFound);
        }

        info!(%table, %id, "record deleted");

        Ok(DeleteOutcome::Deleted(id))
    }
}
