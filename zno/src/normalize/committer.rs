use tracing::{error, info};

use crate::bail;
use crate::error::{ErrorKind, ZnoResult};
use crate::normalize::Phase;
use crate::store::DestinationStore;
use crate::types::{SurrogateId, TableRow};

/// Writes the rows of a phase to the destination as one all-or-nothing unit.
///
/// A single failing row, such as a duplicate `out_id`, aborts the whole phase; nothing
/// of it is written and the destination has to be cleaned before the phase is rerun.
#[derive(Debug, Clone)]
pub struct BatchCommitter<S> {
    store: S,
}

impl<S> BatchCommitter<S>
where
    S: DestinationStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Commits `rows` for `phase` and returns the store-assigned ids in row order.
    pub async fn commit<R>(&self, phase: Phase, rows: Vec<R>) -> ZnoResult<Vec<SurrogateId>>
    where
        R: TableRow,
    {
        let table = phase.table();
        if R::TABLE != table {
            bail!(
                ErrorKind::InvalidState,
                "Rows do not belong to the phase being committed",
                format!("phase {phase} writes {table}, rows are for {}", R::TABLE)
            );
        }

        if rows.is_empty() {
            info!(%phase, "phase has no rows to commit");
            return Ok(Vec::new());
        }

        let row_count = rows.len();
        info!(%phase, rows = row_count, "committing phase");

        let values = rows.into_iter().map(TableRow::into_values).collect();
        match self.store.insert_rows(R::TABLE, values).await {
            Ok(ids) => {
                info!(%phase, rows = ids.len(), "phase committed");
                Ok(ids)
            }
            Err(err) => {
                error!(
                    %phase,
                    rows = row_count,
                    error = %err,
                    "phase commit failed, no rows of the phase were written"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::{RegLocation, Table};

    fn location(name: &str) -> RegLocation {
        RegLocation {
            reg_name: name.to_string(),
            area_name: String::new(),
            ter_name: String::new(),
            ter_type_name: String::new(),
        }
    }

    #[tokio::test]
    async fn commit_returns_ids_in_row_order() {
        let committer = BatchCommitter::new(MemoryStore::new());

        let ids = committer
            .commit(Phase::RegisterLocations, vec![location("a"), location("b")])
            .await
            .unwrap();

        assert_eq!(ids, vec![SurrogateId::new(1), SurrogateId::new(2)]);
        let store = committer.store();
        assert_eq!(store.count_rows(Table::RegisterLocations).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn rows_of_another_table_are_refused() {
        let committer = BatchCommitter::new(MemoryStore::new());

        let err = committer
            .commit(Phase::TestCenters, vec![location("a")])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }
}
