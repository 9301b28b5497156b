use std::fmt;

use tracing::{error, info};

use crate::concurrency::shutdown::{ShutdownRx, ShutdownTx, create_shutdown_channel};
use crate::error::{ErrorKind, ZnoError, ZnoResult};
use crate::normalize::{
    BatchCommitter, DeduplicationIndex, EntityMaterializer, FactLinker, LookupIndexes,
    ParticipantIndex, Phase, PhaseReport, ReferenceResolver,
};
use crate::source::SourceReader;
use crate::store::DestinationStore;
use crate::types::{EducationInstitution, LookupEntity, RegLocation, SourceRecord, TestCenter};
use crate::{bail, zno_error};

/// Per-phase outcome of a completed migration, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    phases: Vec<PhaseReport>,
}

impl MigrationReport {
    pub fn phases(&self) -> &[PhaseReport] {
        &self.phases
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|report| report.phase == phase)
    }

    /// Total rows written across all phases.
    pub fn rows_written(&self) -> usize {
        self.phases.iter().map(|report| report.rows_written).sum()
    }

    fn completed(&self) -> String {
        if self.phases.is_empty() {
            return "none".to_string();
        }

        self.phases
            .iter()
            .map(|report| format!("{} ({} rows)", report.phase, report.rows_written))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.phases {
            writeln!(f, "{report}")?;
        }
        write!(f, "total rows written: {}", self.rows_written())
    }
}

/// A one-shot migration from the flat source into the normalized destination.
///
/// Phases run strictly in [`Phase::ORDER`], each re-reading the full source and committing
/// before the next starts. The destination is expected to be empty: the deduplication state
/// lives only for the duration of [`Migration::run`], so running twice duplicates lookups.
/// A failed run leaves earlier phases committed.
#[derive(Debug)]
pub struct Migration<Src, St> {
    source: Src,
    committer: BatchCommitter<St>,
    shutdown_tx: ShutdownTx,
}

impl<Src, St> Migration<Src, St>
where
    Src: SourceReader,
    St: DestinationStore,
{
    pub fn new(source: Src, store: St) -> Self {
        let (shutdown_tx, _) = create_shutdown_channel();

        Self {
            source,
            committer: BatchCommitter::new(store),
            shutdown_tx,
        }
    }

    /// Returns a handle that cancels the run at the next phase boundary.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    pub fn store(&self) -> &St {
        self.committer.store()
    }

    pub async fn run(&self) -> ZnoResult<MigrationReport> {
        let shutdown_rx = self.shutdown_tx.subscribe();
        let mut report = MigrationReport::default();

        info!("starting migration");

        let reg_locations = self
            .run_lookup_phase::<RegLocation>(Phase::RegisterLocations, &shutdown_rx, &mut report)
            .await?;
        let education_institutions = self
            .run_lookup_phase::<EducationInstitution>(
                Phase::EducationInstitutions,
                &shutdown_rx,
                &mut report,
            )
            .await?;
        let test_centers = self
            .run_lookup_phase::<TestCenter>(Phase::TestCenters, &shutdown_rx, &mut report)
            .await?;
        let lookups = LookupIndexes {
            reg_locations,
            education_institutions,
            test_centers,
        };

        let resolver = ReferenceResolver::new(&lookups);

        // Participants.
        let phase = Phase::Participants;
        let records = self.start_phase(phase, &shutdown_rx, &report).await?;
        let linked = FactLinker::new(resolver).link_participants(&records);
        let ids = self
            .committer
            .commit(phase, linked.rows)
            .await
            .map_err(|err| phase_failed(phase, &report, err))?;
        self.finish_phase(
            &mut report,
            PhaseReport {
                phase,
                records_scanned: records.len(),
                rows_written: ids.len(),
                records_deduplicated: 0,
                records_skipped: linked.skipped,
            },
        );

        // Test results reference participants by the ids the store actually holds.
        let participants = ParticipantIndex::new(
            self.store()
                .participant_ids()
                .await
                .map_err(|err| phase_failed(Phase::TestResults, &report, err))?,
        );
        let resolver = resolver.with_participants(&participants);

        let phase = Phase::TestResults;
        let records = self.start_phase(phase, &shutdown_rx, &report).await?;
        let linked = FactLinker::new(resolver).link_test_results(&records);
        let ids = self
            .committer
            .commit(phase, linked.rows)
            .await
            .map_err(|err| phase_failed(phase, &report, err))?;
        self.finish_phase(
            &mut report,
            PhaseReport {
                phase,
                records_scanned: records.len(),
                rows_written: ids.len(),
                records_deduplicated: 0,
                records_skipped: linked.skipped,
            },
        );

        info!(rows_written = report.rows_written(), "migration completed");

        Ok(report)
    }

    async fn run_lookup_phase<E>(
        &self,
        phase: Phase,
        shutdown_rx: &ShutdownRx,
        report: &mut MigrationReport,
    ) -> ZnoResult<DeduplicationIndex<E>>
    where
        E: LookupEntity,
    {
        let records = self.start_phase(phase, shutdown_rx, report).await?;
        let (index, phase_report) = EntityMaterializer::new(&self.committer)
            .materialize::<E>(phase, &records)
            .await
            .map_err(|err| phase_failed(phase, report, err))?;
        self.finish_phase(report, phase_report);

        Ok(index)
    }

    /// Checks for cancellation, then performs the phase's full scan of the source.
    async fn start_phase(
        &self,
        phase: Phase,
        shutdown_rx: &ShutdownRx,
        report: &MigrationReport,
    ) -> ZnoResult<Vec<SourceRecord>> {
        if shutdown_rx.is_shutdown() {
            info!(%phase, "migration canceled before phase");
            bail!(
                ErrorKind::MigrationCanceled,
                "Migration was canceled",
                format!(
                    "canceled before {phase}, committed phases: {}",
                    report.completed()
                )
            );
        }

        info!(%phase, "starting phase");

        self.source
            .read_records()
            .await
            .map_err(|err| phase_failed(phase, report, err))
    }

    fn finish_phase(&self, report: &mut MigrationReport, phase_report: PhaseReport) {
        info!(
            phase = %phase_report.phase,
            records_scanned = phase_report.records_scanned,
            rows_written = phase_report.rows_written,
            records_deduplicated = phase_report.records_deduplicated,
            records_skipped = phase_report.records_skipped,
            "phase completed"
        );
        report.phases.push(phase_report);
    }
}

/// Wraps a phase failure with what the destination already holds from earlier phases.
fn phase_failed(phase: Phase, report: &MigrationReport, err: ZnoError) -> ZnoError {
    error!(%phase, error = %err, "migration phase failed");

    zno_error!(
        err.kind(),
        "Migration phase failed",
        format!(
            "phase {phase} failed, committed phases: {}",
            report.completed()
        ),
        source: err
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemorySource;
    use crate::store::memory::MemoryStore;
    use crate::test_utils::records::kyiv_record;
    use crate::types::Table;

    #[tokio::test]
    async fn report_lists_phases_in_order() {
        let source = MemorySource::new(vec![
            kyiv_record("X1", "School1"),
            kyiv_record("X2", "School2"),
        ]);
        let migration = Migration::new(source, MemoryStore::new());

        let report = migration.run().await.unwrap();

        let phases: Vec<_> = report.phases().iter().map(|r| r.phase).collect();
        assert_eq!(phases, Phase::ORDER.to_vec());
        let written = |phase| report.phase(phase).unwrap().rows_written;
        assert_eq!(written(Phase::RegisterLocations), 1);
        assert_eq!(written(Phase::TestResults), 2);
        assert_eq!(report.rows_written(), 1 + 2 + 1 + 2 + 2);
    }

    #[tokio::test]
    async fn canceled_migration_writes_nothing() {
        let source = MemorySource::new(vec![kyiv_record("X1", "School1")]);
        let migration = Migration::new(source, MemoryStore::new());
        migration.shutdown_tx().shutdown();

        let err = migration.run().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MigrationCanceled);
        for table in Table::ALL {
            assert_eq!(migration.store().count_rows(table).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn empty_source_yields_empty_destination() {
        let migration = Migration::new(MemorySource::default(), MemoryStore::new());

        let report = migration.run().await.unwrap();

        assert_eq!(report.rows_written(), 0);
        assert_eq!(report.phases().len(), 5);
    }
}
