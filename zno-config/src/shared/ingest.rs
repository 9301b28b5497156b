use serde::Deserialize;

use crate::shared::ValidationError;

/// The open-data export is semicolon separated.
const DEFAULT_DELIMITER: char = ';';

/// Rows loaded into staging when no limit is configured explicitly.
const DEFAULT_ROW_LIMIT: usize = 10_000;

/// Settings for loading the raw CSV export into the staging table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Maximum number of rows to load; `None` loads the whole file.
    #[serde(default = "default_row_limit")]
    pub row_limit: Option<usize>,
}

impl IngestConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.delimiter.is_ascii() {
            return Err(ValidationError::NonAsciiDelimiter(self.delimiter));
        }
        if self.row_limit == Some(0) {
            return Err(ValidationError::RowLimitZero);
        }

        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            row_limit: default_row_limit(),
        }
    }
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_row_limit() -> Option<usize> {
    Some(DEFAULT_ROW_LIMIT)
}
