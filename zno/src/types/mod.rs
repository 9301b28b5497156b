//! Core data types: the flat source record, destination rows and table schema.

mod entity;
mod record;
mod table;

use std::fmt;

pub use entity::*;
pub use record::*;
pub use table::*;

/// Sequential identifier standing in for a natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurrogateId(i64);

impl SurrogateId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SurrogateId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
