use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};
use zno::ingest::CsvReader;
use zno::migrations::{apply_destination_migrations, apply_staging_migrations};
use zno::pipeline::Migration;
use zno::source::SourceReader;
use zno::source::memory::MemorySource;
use zno::source::postgres::PostgresSource;
use zno::store::DestinationStore;
use zno::store::memory::MemoryStore;
use zno::store::postgres::{PostgresStore, create_database_pool};
use zno_config::shared::ZnoConfig;

#[derive(Args)]
pub(crate) struct MigrateArgs {
    /// Migrate a CSV export into memory instead of the configured databases and only
    /// print the report
    #[arg(long, value_name = "FILE")]
    dry_run: Option<PathBuf>,
}

impl MigrateArgs {
    pub(crate) async fn run(self, config: &ZnoConfig) -> Result<()> {
        if let Some(path) = self.dry_run {
            info!(path = %path.display(), "dry run, nothing is written to the destination");

            let parsed = CsvReader::new(&config.ingest)?.read_path(&path)?;
            let migration = Migration::new(MemorySource::new(parsed.records), MemoryStore::new());

            return run_until_canceled(migration).await;
        }

        let max_connections = config.migration.max_pool_connections;
        let source_pool = create_database_pool(&config.source, max_connections);
        let destination_pool = create_database_pool(&config.destination, max_connections);

        apply_staging_migrations(&source_pool).await?;
        apply_destination_migrations(&destination_pool).await?;

        let migration = Migration::new(
            PostgresSource::new(source_pool),
            PostgresStore::new(destination_pool),
        );

        run_until_canceled(migration).await
    }
}

/// Runs the migration, canceling it at the next phase boundary on Ctrl+C.
async fn run_until_canceled<Src, St>(migration: Migration<Src, St>) -> Result<()>
where
    Src: SourceReader,
    St: DestinationStore,
{
    let shutdown_tx = migration.shutdown_tx();
    let shutdown_handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("sigint (ctrl+c) received, canceling migration after the current phase");
                shutdown_tx.shutdown();
            }
            Err(err) => warn!(error = %err, "failed to listen for ctrl+c"),
        }
    });

    let result = migration.run().await;
    shutdown_handle.abort();

    let report = result?;
    println!("{report}");

    Ok(())
}
