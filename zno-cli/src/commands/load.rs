use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use zno::ingest::{StagingWriter, load_file};
use zno::migrations::apply_staging_migrations;
use zno::store::postgres::create_database_pool;
use zno_config::shared::ZnoConfig;

#[derive(Args)]
pub(crate) struct LoadArgs {
    /// Path of the semicolon separated CSV export
    #[arg(long)]
    file: PathBuf,

    /// Maximum number of rows to load, overriding the configuration
    #[arg(long, conflicts_with = "all")]
    row_limit: Option<usize>,

    /// Load every row of the file
    #[arg(long)]
    all: bool,
}

impl LoadArgs {
    pub(crate) async fn run(self, config: &ZnoConfig) -> Result<()> {
        let mut ingest = config.ingest.clone();
        if self.all {
            ingest.row_limit = None;
        } else if let Some(row_limit) = self.row_limit {
            anyhow::ensure!(row_limit > 0, "--row-limit must be greater than zero");
            ingest.row_limit = Some(row_limit);
        }

        let pool = create_database_pool(&config.source, config.migration.max_pool_connections);
        apply_staging_migrations(&pool).await?;

        let report = load_file(&self.file, &ingest, &StagingWriter::new(pool)).await?;
        println!("{report}");

        Ok(())
    }
}
