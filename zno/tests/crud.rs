#![cfg(feature = "test-utils")]

use std::collections::BTreeMap;

use zno::crud::{CrudService, DeleteOutcome, InsertOutcome, InsertRejection};
use zno::pipeline::Migration;
use zno::source::memory::MemorySource;
use zno::store::DestinationStore;
use zno::store::memory::MemoryStore;
use zno::test_utils::records::kyiv_record;
use zno::types::{SurrogateId, Table};
use zno_telemetry::tracing::init_test_tracing;

async fn migrated() -> CrudService<MemoryStore> {
    let store = MemoryStore::new();
    let source = MemorySource::new(vec![
        kyiv_record("X1", "School1"),
        kyiv_record("X2", "School2"),
    ]);
    Migration::new(source, store.clone()).run().await.unwrap();

    CrudService::new(store)
}

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}

#[tokio::test]
async fn existing_out_id_is_rejected_and_count_unchanged() {
    init_test_tracing();

    let service = migrated().await;
    let store = service.store();
    let before = store.count_rows(Table::Participants).await.unwrap();

    let outcome = service
        .insert(
            Table::Participants,
            &fields(&[
                ("out_id", "X1"),
                ("reg_location_id", "1"),
                ("edu_institution_id", "1"),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        InsertOutcome::Rejected(InsertRejection::DuplicateOutId("X1".to_string()))
    );
    let after = store.count_rows(Table::Participants).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_result_insert_validates_both_references() {
    init_test_tracing();

    let service = migrated().await;

    let missing_center = service
        .insert(
            Table::TestResults,
            &fields(&[("participant_id", "1"), ("test_center_id", "9")]),
        )
        .await
        .unwrap();
    let inserted = service
        .insert(
            Table::TestResults,
            &fields(&[
                ("participant_id", "2"),
                ("test_center_id", "1"),
                ("ukr_test", "Українська мова"),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(
        missing_center,
        InsertOutcome::Rejected(InsertRejection::MissingReference {
            column: "test_center_id",
            id: SurrogateId::new(9),
            target: Table::TestCenters,
        })
    );
    assert_eq!(inserted, InsertOutcome::Inserted(SurrogateId::new(3)));
}

#[tokio::test]
async fn unfiltered_read_is_ordered_by_id() {
    init_test_tracing();

    let service = migrated().await;
    service
        .insert(
            Table::EducationInstitutions,
            &fields(&[("eo_name", "School0")]),
        )
        .await
        .unwrap();

    let rows = service
        .query(Table::EducationInstitutions, &BTreeMap::new())
        .await
        .unwrap();

    let ids: Vec<_> = rows.iter().map(|row| row.id.into_inner()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn deleting_a_missing_participant_changes_nothing() {
    init_test_tracing();

    let service = migrated().await;
    let store = service.store();
    let before = store.count_rows(Table::Participants).await.unwrap();

    let outcome = service.delete(Table::Participants, "42").await.unwrap();

    assert_eq!(outcome, DeleteOutcome::NotFound);
    let after = store.count_rows(Table::Participants).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn referenced_participant_cannot_be_deleted() {
    init_test_tracing();

    let service = migrated().await;

    let err = service.delete(Table::Participants, "1").await.unwrap_err();

    assert_eq!(err.kind(), zno::error::ErrorKind::ConstraintViolation);
    assert_eq!(
        service.delete(Table::TestResults, "1").await.unwrap(),
        DeleteOutcome::Deleted(SurrogateId::new(1))
    );
    assert_eq!(
        service.delete(Table::Participants, "1").await.unwrap(),
        DeleteOutcome::Deleted(SurrogateId::new(1))
    );
}
