//! Coordination between a running migration and whoever may want to stop it.

pub mod shutdown;
