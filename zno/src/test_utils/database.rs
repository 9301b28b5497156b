use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;
use zno_config::shared::{IntoConnectOptions, PgConnectionConfig, TlsConfig};

use crate::migrations::{apply_destination_migrations, apply_staging_migrations};

/// Connection settings for a fresh, uniquely named database on the local test server.
///
/// Reads `TESTS_DATABASE_HOST`, `TESTS_DATABASE_PORT`, `TESTS_DATABASE_USERNAME` and,
/// optionally, `TESTS_DATABASE_PASSWORD`.
pub fn local_pg_connection_config() -> PgConnectionConfig {
    PgConnectionConfig {
        host: std::env::var("TESTS_DATABASE_HOST").expect("TESTS_DATABASE_HOST must be set"),
        port: std::env::var("TESTS_DATABASE_PORT")
            .expect("TESTS_DATABASE_PORT must be set")
            .parse()
            .expect("TESTS_DATABASE_PORT must be a valid port number"),
        name: Uuid::new_v4().to_string(),
        username: std::env::var("TESTS_DATABASE_USERNAME")
            .expect("TESTS_DATABASE_USERNAME must be set"),
        password: std::env::var("TESTS_DATABASE_PASSWORD")
            .ok()
            .map(Into::into),
        tls: TlsConfig::default(),
    }
}

/// A throwaway database with the staging and destination schemas applied.
#[derive(Debug)]
pub struct TestDatabase {
    pub config: PgConnectionConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Creates the database and runs every migration on it.
    ///
    /// # Panics
    /// Panics if the server is unreachable or a migration fails.
    pub async fn spawn() -> Self {
        let config = local_pg_connection_config();

        let mut connection = PgConnection::connect_with(&config.without_db())
            .await
            .expect("Failed to connect to Postgres");
        connection
            .execute(&*format!(r#"create database "{}";"#, config.name))
            .await
            .expect("Failed to create database");

        let pool = PgPool::connect_with(config.with_db())
            .await
            .expect("Failed to connect to Postgres");
        apply_staging_migrations(&pool)
            .await
            .expect("Failed to apply staging migrations");
        apply_destination_migrations(&pool)
            .await
            .expect("Failed to apply destination migrations");

        Self { config, pool }
    }

    /// Closes the pool and drops the database. Failures are only reported.
    pub async fn cleanup(self) {
        self.pool.close().await;

        let mut connection = match PgConnection::connect_with(&self.config.without_db()).await {
            Ok(connection) => connection,
            Err(err) => {
                eprintln!("warning: failed to connect to Postgres for cleanup: {err}");
                return;
            }
        };

        if let Err(err) = connection
            .execute(&*format!(
                r#"drop database if exists "{}" with (force);"#,
                self.config.name
            ))
            .await
        {
            eprintln!(
                "warning: failed to drop database {}: {err}",
                self.config.name
            );
        }
    }
}
