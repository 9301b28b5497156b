use tracing::info;

use crate::error::ZnoResult;
use crate::normalize::{BatchCommitter, DeduplicationIndex, Phase, PhaseReport};
use crate::store::DestinationStore;
use crate::types::{LookupEntity, SourceRecord};

/// Registers every record's key and returns the rows of first-seen keys in order.
fn distinct_rows<E>(
    records: &[SourceRecord],
    index: &mut DeduplicationIndex<E>,
) -> ZnoResult<Vec<E>>
where
    E: LookupEntity,
{
    let mut rows = Vec::new();
    for record in records {
        let key = E::from_record(record);
        if let (_, true) = index.register(key.clone())? {
            rows.push(key);
        }
    }

    Ok(rows)
}

/// Produces exactly one destination row per distinct natural key of a lookup entity.
#[derive(Debug)]
pub struct EntityMaterializer<'a, S> {
    committer: &'a BatchCommitter<S>,
}

impl<'a, S> EntityMaterializer<'a, S>
where
    S: DestinationStore,
{
    pub fn new(committer: &'a BatchCommitter<S>) -> Self {
        Self { committer }
    }

    /// Runs one lookup phase and rebinds its index to the ids the store assigned.
    pub async fn materialize<E>(
        &self,
        phase: Phase,
        records: &[SourceRecord],
    ) -> ZnoResult<(DeduplicationIndex<E>, PhaseReport)>
    where
        E: LookupEntity,
    {
        let mut index = DeduplicationIndex::new();
        let rows = distinct_rows(records, &mut index)?;
        let distinct = rows.len();

        info!(%phase, records = records.len(), distinct, "deduplicated lookup keys");

        let store_ids = self.committer.commit(phase, rows).await?;
        index.bind_store_ids(&store_ids)?;

        let report = PhaseReport {
            phase,
            records_scanned: records.len(),
            rows_written: store_ids.len(),
            records_deduplicated: records.len() - distinct,
            records_skipped: 0,
        };

        Ok((index, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::test_utils::records::{kyiv_record, record};
    use crate::types::{EducationInstitution, RegLocation, SurrogateId};

    #[test]
    fn repeated_keys_yield_one_row() {
        let records = vec![
            kyiv_record("X1", "School1"),
            kyiv_record("X2", "School2"),
            kyiv_record("X3", "School1"),
        ];
        let mut index = DeduplicationIndex::new();

        let locations: Vec<RegLocation> = distinct_rows(&records, &mut index).unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].reg_name, "Kyiv");
    }

    #[test]
    fn rows_keep_first_seen_order() {
        let records = vec![
            kyiv_record("X1", "School2"),
            kyiv_record("X2", "School1"),
            kyiv_record("X3", "School2"),
        ];
        let mut index = DeduplicationIndex::new();

        let institutions: Vec<EducationInstitution> = distinct_rows(&records, &mut index).unwrap();

        let names: Vec<_> = institutions.iter().map(|i| i.eo_name.as_str()).collect();
        assert_eq!(names, vec!["School2", "School1"]);
    }

    #[tokio::test]
    async fn materialized_index_holds_store_ids() {
        let store = MemoryStore::new();
        let committer = BatchCommitter::new(store);
        // Occupy ids so store ids differ from run-local ids.
        committer
            .commit(
                Phase::RegisterLocations,
                vec![RegLocation::from_record(&record("OLD", "Odesa", "School9"))],
            )
            .await
            .unwrap();
        let records = vec![
            kyiv_record("X1", "School1"),
            record("X2", "Lviv", "School2"),
        ];

        let (index, report) = EntityMaterializer::new(&committer)
            .materialize::<RegLocation>(Phase::RegisterLocations, &records)
            .await
            .unwrap();

        assert_eq!(
            index.lookup(&RegLocation::from_record(&records[0])),
            Some(SurrogateId::new(2))
        );
        assert_eq!(
            index.lookup(&RegLocation::from_record(&records[1])),
            Some(SurrogateId::new(3))
        );
        assert_eq!(report.rows_written, 2);
        assert_eq!(report.records_deduplicated, 0);
    }
}
