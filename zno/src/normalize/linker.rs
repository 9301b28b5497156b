use tracing::debug;

use crate::normalize::ReferenceResolver;
use crate::types::{
    EducationInstitution, NewParticipant, NewTestResult, RegLocation, SourceRecord, TestCenter,
};

/// Rows produced by a linking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linked<R> {
    pub rows: Vec<R>,
    /// Records dropped because a reference could not be resolved.
    pub skipped: usize,
}

/// Builds participant and test result rows with their references resolved.
///
/// A record missing any of its references produces no row. Nothing is reported beyond
/// the skip count and a debug event, mirroring how an inner join drops unmatched rows.
#[derive(Debug, Clone, Copy)]
pub struct FactLinker<'a> {
    resolver: ReferenceResolver<'a>,
}

impl<'a> FactLinker<'a> {
    pub fn new(resolver: ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn link_participants(&self, records: &[SourceRecord]) -> Linked<NewParticipant> {
        let mut rows = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            let reg_location_id = self.resolver.resolve::<RegLocation>(record);
            let edu_institution_id = self.resolver.resolve::<EducationInstitution>(record);

            match (reg_location_id, edu_institution_id) {
                (Some(location_id), Some(institution_id)) => {
                    rows.push(NewParticipant::from_record(record, location_id, institution_id));
                }
                _ => {
                    debug!(out_id = %record.out_id, "skipping participant with unresolved lookup");
                    skipped += 1;
                }
            }
        }

        Linked { rows, skipped }
    }

    pub fn link_test_results(&self, records: &[SourceRecord]) -> Linked<NewTestResult> {
        let mut rows = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            let participant_id = self.resolver.resolve_participant(record);
            let test_center_id = self.resolver.resolve::<TestCenter>(record);

            match (participant_id, test_center_id) {
                (Some(participant_id), Some(test_center_id)) => {
                    rows.push(NewTestResult::from_record(record, participant_id, test_center_id));
                }
                _ => {
                    debug!(
                        out_id = %record.out_id,
                        "skipping test result with unresolved reference"
                    );
                    skipped += 1;
                }
            }
        }

        Linked { rows, skipped }
    }
}
