use std::future::Future;

use crate::error::ZnoResult;
use crate::types::{Condition, Record, SurrogateId, Table, Value};

/// Repository over the normalized destination schema.
///
/// Implementations must enforce the schema's constraints: `participants.out_id` is unique
/// and every reference column points at an existing row. Identifiers are assigned by the
/// store, sequentially, on insert.
pub trait DestinationStore {
    /// Inserts `rows` into `table` as one atomic unit.
    ///
    /// Each row holds values ordered like [`Table::columns`]. Returns the assigned ids in
    /// input order. If any row violates a constraint nothing is written and the error has
    /// [`crate::error::ErrorKind::ConstraintViolation`].
    fn insert_rows(
        &self,
        table: Table,
        rows: Vec<Vec<Value>>,
    ) -> impl Future<Output = ZnoResult<Vec<SurrogateId>>> + Send;

    /// Returns rows matching every condition, ordered by ascending id.
    ///
    /// An empty condition list returns the whole table. Values are always bound as
    /// parameters, never spliced into query text.
    fn select_rows(
        &self,
        table: Table,
        conditions: &[Condition],
    ) -> impl Future<Output = ZnoResult<Vec<Record>>> + Send;

    /// Returns whether a row with `id` exists in `table`.
    fn row_exists(
        &self,
        table: Table,
        id: SurrogateId,
    ) -> impl Future<Output = ZnoResult<bool>> + Send;

    /// Returns the number of rows in `table`.
    fn count_rows(&self, table: Table) -> impl Future<Output = ZnoResult<u64>> + Send;

    /// Deletes the row with `id`, returning whether one existed.
    ///
    /// Fails with a constraint violation when other rows still reference it.
    fn delete_row(
        &self,
        table: Table,
        id: SurrogateId,
    ) -> impl Future<Output = ZnoResult<bool>> + Send;

    /// Returns `(out_id, id)` of every committed participant.
    fn participant_ids(&self) -> impl Future<Output = ZnoResult<Vec<(String, SurrogateId)>>> + Send;
}
