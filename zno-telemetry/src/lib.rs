//! Tracing setup shared by the `zno` binary and the test suites.

pub mod tracing;
