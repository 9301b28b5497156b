use thiserror::Error;

use crate::types::{SurrogateId, Table};

/// Reason an insert was refused before anything was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertRejection {
    #[error("{table} has no insertable column `{column}`")]
    UnknownColumn { table: Table, column: String },

    #[error("out_id `{0}` is not unique in participants")]
    DuplicateOutId(String),

    #[error("{column} must be an integer value, got `{value}`")]
    NonNumericReference { column: &'static str, value: String },

    #[error("foreign key validation failed for {column}={id}, no record found in {target}")]
    MissingReference {
        column: &'static str,
        id: SurrogateId,
        target: Table,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(SurrogateId),
    Rejected(InsertRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(SurrogateId),
    /// No row had the requested id; nothing was changed.
    NotFound,
}
