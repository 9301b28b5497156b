mod base;
mod connection;
mod ingest;
mod migration;
mod zno;

pub use base::*;
pub use connection::*;
pub use ingest::*;
pub use migration::*;
pub use zno::*;
