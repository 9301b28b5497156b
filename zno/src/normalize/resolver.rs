use std::collections::HashMap;

use crate::normalize::{Indexed, LookupIndexes};
use crate::types::{SourceRecord, SurrogateId};

/// Committed participants keyed by `out_id`.
///
/// Built from what the store actually holds after the participants phase, so test results
/// only ever point at rows that exist.
#[derive(Debug, Clone, Default)]
pub struct ParticipantIndex {
    ids: HashMap<String, SurrogateId>,
}

impl ParticipantIndex {
    pub fn new(committed: Vec<(String, SurrogateId)>) -> Self {
        let mut ids = HashMap::with_capacity(committed.len());
        for (out_id, id) in committed {
            ids.entry(out_id).or_insert(id);
        }

        Self { ids }
    }

    pub fn lookup(&self, out_id: &str) -> Option<SurrogateId> {
        self.ids.get(out_id).copied()
    }
}

/// Resolves the references of a source record against committed lookups.
///
/// Resolution is exact: a record whose key is absent from an index resolves to `None`.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    lookups: &'a LookupIndexes,
    participants: Option<&'a ParticipantIndex>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(lookups: &'a LookupIndexes) -> Self {
        Self {
            lookups,
            participants: None,
        }
    }

    pub fn with_participants(mut self, participants: &'a ParticipantIndex) -> Self {
        self.participants = Some(participants);
        self
    }

    /// Returns the id of the lookup entity `E` the record refers to.
    pub fn resolve<E>(&self, record: &SourceRecord) -> Option<SurrogateId>
    where
        E: Indexed,
    {
        E::index(self.lookups).lookup(&E::from_record(record))
    }

    /// Returns the id of the participant the record belongs to.
    ///
    /// Always `None` before participants have been committed.
    pub fn resolve_participant(&self, record: &SourceRecord) -> Option<SurrogateId> {
        self.participants?.lookup(&record.out_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::records::{kyiv_record, record};
    use crate::types::{LookupEntity, RegLocation, TestCenter};

    #[test]
    fn known_key_resolves_to_its_id() {
        let mut lookups = LookupIndexes::default();
        let kyiv = kyiv_record("X1", "School1");
        lookups
            .reg_locations
            .register(RegLocation::from_record(&kyiv))
            .unwrap();

        let resolver = ReferenceResolver::new(&lookups);

        assert_eq!(
            resolver.resolve::<RegLocation>(&kyiv),
            Some(SurrogateId::new(1))
        );
        assert_eq!(
            resolver.resolve::<RegLocation>(&record("X2", "Lviv", "School1")),
            None
        );
        assert_eq!(resolver.resolve::<TestCenter>(&kyiv), None);
    }

    #[test]
    fn participant_resolution_needs_committed_participants() {
        let lookups = LookupIndexes::default();
        let participants = ParticipantIndex::new(vec![("X1".to_string(), SurrogateId::new(7))]);
        let kyiv = kyiv_record("X1", "School1");

        let without = ReferenceResolver::new(&lookups);
        let with = without.with_participants(&participants);

        assert_eq!(without.resolve_participant(&kyiv), None);
        assert_eq!(with.resolve_participant(&kyiv), Some(SurrogateId::new(7)));
        assert_eq!(
            with.resolve_participant(&kyiv_record("X2", "School1")),
            None
        );
    }
}
