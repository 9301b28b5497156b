//! Tests against a live Postgres server configured through `TESTS_DATABASE_*`.

use std::collections::BTreeMap;

use zno::crud::{CrudService, InsertOutcome};
use zno::ingest::StagingWriter;
use zno::pipeline::Migration;
use zno::source::SourceReader;
use zno::source::postgres::PostgresSource;
use zno::store::DestinationStore;
use zno::store::postgres::PostgresStore;
use zno::test_utils::database::TestDatabase;
use zno::test_utils::records::{kyiv_record, record};
use zno::types::{Condition, Table, Value};
use zno_telemetry::tracing::init_test_tracing;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Postgres server configured through TESTS_DATABASE_*"]
async fn staged_records_migrate_into_normalized_tables() {
    init_test_tracing();

    let database = TestDatabase::spawn().await;
    let records = vec![
        kyiv_record("X1", "School1"),
        kyiv_record("X2", "School2"),
        record("X3", "Lviv", "School1"),
    ];
    let written = StagingWriter::new(database.pool.clone())
        .write(&records)
        .await
        .unwrap();
    assert_eq!(written, 3);

    let source = PostgresSource::new(database.pool.clone());
    assert_eq!(source.read_records().await.unwrap(), records);

    let store = PostgresStore::new(database.pool.clone());
    let report = Migration::new(source, store.clone()).run().await.unwrap();

    for (table, count) in [
        (Table::RegisterLocations, 2),
        (Table::EducationInstitutions, 3),
        (Table::TestCenters, 1),
        (Table::Participants, 3),
        (Table::TestResults, 3),
    ] {
        assert_eq!(store.count_rows(table).await.unwrap(), count, "{table}");
    }
    assert_eq!(report.rows_written(), 2 + 3 + 1 + 3 + 3);

    let kyiv = store
        .select_rows(
            Table::Participants,
            &[Condition::new("reg_location_id", Value::Integer(1))],
        )
        .await
        .unwrap();
    assert_eq!(kyiv.len(), 2);

    database.cleanup().await;
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Postgres server configured through TESTS_DATABASE_*"]
async fn null_staging_values_are_read_as_empty_strings() {
    init_test_tracing();

    let database = TestDatabase::spawn().await;
    sqlx::query("insert into ukr_source_records (out_id) values ('X1')")
        .execute(&database.pool)
        .await
        .unwrap();

    let records = PostgresSource::new(database.pool.clone())
        .read_records()
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].out_id, "X1");
    assert_eq!(records[0].reg_name, "");

    database.cleanup().await;
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Postgres server configured through TESTS_DATABASE_*"]
async fn crud_filters_are_bound_as_parameters() {
    init_test_tracing();

    let database = TestDatabase::spawn().await;
    let service = CrudService::new(PostgresStore::new(database.pool.clone()));
    let fields = |pairs: &[(&str, &str)]| {
        pairs
            .iter()
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect::<BTreeMap<_, _>>()
    };

    let outcome = service
        .insert(Table::RegisterLocations, &fields(&[("reg_name", "Kyiv")]))
        .await
        .unwrap();
    assert!(matches!(outcome, InsertOutcome::Inserted(_)));

    let injected = service
        .query(
            Table::RegisterLocations,
            &fields(&[("reg_name", "x' or '1'='1")]),
        )
        .await
        .unwrap();
    let matching = service
        .query(Table::RegisterLocations, &fields(&[("reg_name", "Kyiv")]))
        .await
        .unwrap();

    assert!(injected.is_empty());
    assert_eq!(matching.len(), 1);

    database.cleanup().await;
}
