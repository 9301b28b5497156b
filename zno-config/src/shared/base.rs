use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// TLS is enabled but no trusted root certificates are provided.
    #[error("Invalid TLS config: `trusted_root_certs` must be set when `enabled` is true")]
    MissingTrustedRootCerts,
    /// The destination pool must be allowed at least one connection.
    #[error("`max_pool_connections` cannot be zero")]
    MaxPoolConnectionsZero,
    /// A row limit of zero would load nothing.
    #[error("`row_limit` cannot be zero, omit it to load every row")]
    RowLimitZero,
    /// The CSV delimiter must be a single-byte character.
    #[error("`delimiter` must be an ASCII character, got `{0}`")]
    NonAsciiDelimiter(char),
}
