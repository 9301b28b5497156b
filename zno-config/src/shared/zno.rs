use serde::Deserialize;

use crate::Config;
use crate::shared::{IngestConfig, MigrationConfig, PgConnectionConfig, ValidationError};

/// Complete configuration of the `zno` tool.
///
/// Intentionally not [`serde::Serialize`] so the database passwords cannot leak
/// through a serialized form.
#[derive(Debug, Clone, Deserialize)]
pub struct ZnoConfig {
    /// Staging database holding the flat dataset.
    pub source: PgConnectionConfig,
    /// Database receiving the normalized tables.
    pub destination: PgConnectionConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
}

impl ZnoConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.source.validate()?;
        self.destination.validate()?;
        self.ingest.validate()?;
        self.migration.validate()
    }
}

impl Config for ZnoConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}
