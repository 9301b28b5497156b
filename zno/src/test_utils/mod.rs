//! Fixtures shared by unit and integration tests.

pub mod database;
pub mod records;
