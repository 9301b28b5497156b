//! Record-level maintenance of the destination tables: filtered reads, validated inserts
//! and deletes by id.

mod outcome;
mod service;

pub use outcome::{DeleteOutcome, InsertOutcome, InsertRejection};
pub use service::CrudService;
