use serde::Deserialize;

use crate::shared::ValidationError;

const DEFAULT_MAX_POOL_CONNECTIONS: u32 = 2;

/// Settings for the normalization run and the CRUD console.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MigrationConfig {
    /// Upper bound of pooled connections per database.
    #[serde(default = "default_max_pool_connections")]
    pub max_pool_connections: u32,
}

impl MigrationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_pool_connections == 0 {
            return Err(ValidationError::MaxPoolConnectionsZero);
        }

        Ok(())
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            max_pool_connections: DEFAULT_MAX_POOL_CONNECTIONS,
        }
    }
}

fn default_max_pool_connections() -> u32 {
    DEFAULT_MAX_POOL_CONNECTIONS
}
