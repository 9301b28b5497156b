use sqlx::PgPool;
use tracing::info;

use crate::error::ZnoResult;

/// Creates the staging table the flat dataset is loaded into.
///
/// Migrations recorded by the destination migrator are ignored, so staging and destination
/// may share one database.
pub async fn apply_staging_migrations(pool: &PgPool) -> ZnoResult<()> {
    info!("applying staging migrations");

    let mut migrator = sqlx::migrate!("./migrations/staging");
    migrator.set_ignore_missing(true);
    migrator.run(pool).await?;

    info!("staging migrations successfully applied");

    Ok(())
}

/// Creates the five normalized destination tables with their constraints.
pub async fn apply_destination_migrations(pool: &PgPool) -> ZnoResult<()> {
    info!("applying destination migrations");

    let mut migrator = sqlx::migrate!("./migrations/destination");
    migrator.set_ignore_missing(true);
    migrator.run(pool).await?;

    info!("destination migrations successfully applied");

    Ok(())
}
