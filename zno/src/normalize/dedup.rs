use std::collections::HashMap;
use std::hash::Hash;

use crate::bail;
use crate::error::{ErrorKind, ZnoResult};
use crate::types::{EducationInstitution, LookupEntity, RegLocation, SurrogateId, TestCenter};

/// Maps natural keys of one entity type to surrogate ids for the duration of a run.
///
/// Keys are compared literally. The index starts empty and is never persisted, so a
/// second run has no memory of the first one.
#[derive(Debug, Clone)]
pub struct DeduplicationIndex<K> {
    ids: HashMap<K, SurrogateId>,
    /// Set once the run-local ids have been replaced by ids assigned by the store.
    committed: bool,
}

impl<K> DeduplicationIndex<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            committed: false,
        }
    }

    /// Registers `key`, returning its id and whether it was seen for the first time.
    ///
    /// New keys get the next sequential id, starting at 1. Once store ids are bound, known
    /// keys still resolve but new keys are refused, as no store row exists for them.
    pub fn register(&mut self, key: K) -> ZnoResult<(SurrogateId, bool)> {
        if let Some(id) = self.ids.get(&key) {
            return Ok((*id, false));
        }
        if self.committed {
            bail!(
                ErrorKind::InvalidState,
                "New keys cannot be registered after store ids were bound"
            );
        }

        let id = SurrogateId::new(self.ids.len() as i64 + 1);
        self.ids.insert(key, id);

        Ok((id, true))
    }

    /// Returns the id registered for `key`, if any.
    pub fn lookup(&self, key: &K) -> Option<SurrogateId> {
        self.ids.get(key).copied()
    }

    /// Replaces the run-local ids with the ids the store assigned on commit.
    ///
    /// `store_ids[n]` is the store id of the key registered with local id `n + 1`, which is
    /// the order rows are handed to the store in.
    pub fn bind_store_ids(&mut self, store_ids: &[SurrogateId]) -> ZnoResult<()> {
        if self.committed {
            bail!(
                ErrorKind::InvalidState,
                "Store ids were already bound to this index"
            );
        }
        if store_ids.len() != self.ids.len() {
            bail!(
                ErrorKind::InvalidState,
                "Committed row count does not match the index",
                format!(
                    "{} keys registered, {} ids committed",
                    self.ids.len(),
                    store_ids.len()
                )
            );
        }

        for id in self.ids.values_mut() {
            *id = store_ids[(id.into_inner() - 1) as usize];
        }
        self.committed = true;

        Ok(())
    }
}

impl<K> Default for DeduplicationIndex<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// The indexes of the three independent lookup entities.
#[derive(Debug, Clone, Default)]
pub struct LookupIndexes {
    pub reg_locations: DeduplicationIndex<RegLocation>,
    pub education_institutions: DeduplicationIndex<EducationInstitution>,
    pub test_centers: DeduplicationIndex<TestCenter>,
}

/// Selects the index of one lookup entity type out of [`LookupIndexes`].
pub trait Indexed: LookupEntity {
    fn index(indexes: &LookupIndexes) -> &DeduplicationIndex<Self>;
}

impl Indexed for RegLocation {
    fn index(indexes: &LookupIndexes) -> &DeduplicationIndex<Self> {
        &indexes.reg_locations
    }
}

impl Indexed for EducationInstitution {
    fn index(indexes: &LookupIndexes) -> &DeduplicationIndex<Self> {
        &indexes.education_institutions
    }
}

impl Indexed for TestCenter {
    fn index(indexes: &LookupIndexes) -> &DeduplicationIndex<Self> {
        &indexes.test_centers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_get_the_first_id() {
        let mut index = DeduplicationIndex::new();

        assert_eq!(index.register("kyiv").unwrap(), (SurrogateId::new(1), true));
        assert_eq!(index.register("lviv").unwrap(), (SurrogateId::new(2), true));
        assert_eq!(
            index.register("kyiv").unwrap(),
            (SurrogateId::new(1), false)
        );
    }

    #[test]
    fn empty_strings_are_ordinary_keys() {
        let mut index = DeduplicationIndex::new();

        let (empty, _) = index.register(("".to_string(), "".to_string())).unwrap();
        let (blank, is_new) = index.register((" ".to_string(), "".to_string())).unwrap();

        assert!(is_new);
        assert_ne!(empty, blank);
        assert_eq!(index.lookup(&("".to_string(), "".to_string())), Some(empty));
    }

    #[test]
    fn lookup_of_unknown_key_is_none() {
        let index: DeduplicationIndex<&str> = DeduplicationIndex::new();

        assert_eq!(index.lookup(&"odesa"), None);
    }

    #[test]
    fn binding_store_ids_remaps_in_registration_order() {
        let mut index = DeduplicationIndex::new();
        index.register("kyiv").unwrap();
        index.register("lviv").unwrap();

        index
            .bind_store_ids(&[SurrogateId::new(41), SurrogateId::new(42)])
            .unwrap();

        assert_eq!(index.lookup(&"kyiv"), Some(SurrogateId::new(41)));
        assert_eq!(index.lookup(&"lviv"), Some(SurrogateId::new(42)));
    }

    #[test]
    fn binding_requires_one_id_per_key() {
        let mut index = DeduplicationIndex::new();
        index.register("kyiv").unwrap();

        let err = index.bind_store_ids(&[]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn binding_twice_is_rejected() {
        let mut index = DeduplicationIndex::new();
        index.register("kyiv").unwrap();
        index.bind_store_ids(&[SurrogateId::new(5)]).unwrap();

        let err = index.bind_store_ids(&[SurrogateId::new(5)]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn bound_index_refuses_new_keys() {
        let mut index = DeduplicationIndex::new();
        index.register("kyiv").unwrap();
        index.bind_store_ids(&[SurrogateId::new(9)]).unwrap();

        let err = index.register("lviv").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(
            index.register("kyiv").unwrap(),
            (SurrogateId::new(9), false)
        );
        assert_eq!(index.lookup(&"lviv"), None);
    }
}
