//! Configuration for the ZNO normalization tools.
//!
//! Holds the connection settings for the staging (source) and normalized (destination)
//! databases, ingestion and migration tuning, and the loader that assembles them from
//! configuration files and `APP_` environment variables.

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{Config, LoadConfigError, load_config, load_config_from};
