//! Error types and result definitions for normalization runs.
//!
//! [`ZnoError`] carries an [`ErrorKind`] classification, a static description, optional
//! dynamic detail and source, and the call-site location where it was raised.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Result type used throughout the crate.
pub type ZnoResult<T> = Result<T, ZnoError>;

/// Main error type of the crate.
#[derive(Debug, Clone)]
pub struct ZnoError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

/// Classification of failures.
///
/// Resolution misses during a migration are not errors and have no kind here; they are
/// counted as skipped records instead.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Connection & query errors
    ConnectionFailed,
    QueryFailed,
    SourceQueryFailed,
    SchemaMigrationFailed,

    // Integrity errors
    ConstraintViolation,
    ValidationError,

    // Data errors
    MalformedSourceRecord,
    ConversionError,

    // Run control
    MigrationCanceled,
    InvalidState,

    // Ambient
    ConfigError,
    IoError,

    Unknown,
}

impl ZnoError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the dynamic detail, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Attaches the originating error, exposed through [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
    ) -> Self {
        ZnoError {
            kind,
            description,
            detail,
            source: None,
            location: Location::caller(),
        }
    }
}

impl PartialEq for ZnoError {
    fn eq(&self, other: &ZnoError) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for ZnoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {} @ {}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line()
        )?;
        if let Some(detail) = &self.detail {
            for line in detail.lines() {
                write!(f, "\n  {line}")?;
            }
        }

        Ok(())
    }
}

impl error::Error for ZnoError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

impl From<(ErrorKind, &'static str)> for ZnoError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> ZnoError {
        ZnoError::from_components(kind, Cow::Borrowed(desc), None)
    }
}

impl<D> From<(ErrorKind, &'static str, D)> for ZnoError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> ZnoError {
        ZnoError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()))
    }
}

impl From<std::io::Error> for ZnoError {
    #[track_caller]
    fn from(err: std::io::Error) -> ZnoError {
        ZnoError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(err.to_string())),
        )
        .with_source(err)
    }
}

impl From<std::num::ParseIntError> for ZnoError {
    #[track_caller]
    fn from(err: std::num::ParseIntError) -> ZnoError {
        ZnoError::from_components(
            ErrorKind::ConversionError,
            Cow::Borrowed("Integer parsing failed"),
            Some(Cow::Owned(err.to_string())),
        )
        .with_source(err)
    }
}

/// Source rows that cannot be read are fatal for the ingestion step.
impl From<csv::Error> for ZnoError {
    #[track_caller]
    fn from(err: csv::Error) -> ZnoError {
        let (kind, description) = if err.is_io_error() {
            (ErrorKind::IoError, "CSV input could not be read")
        } else {
            (ErrorKind::MalformedSourceRecord, "CSV record is malformed")
        };

        ZnoError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(err.to_string())),
        )
        .with_source(err)
    }
}

impl From<sqlx::migrate::MigrateError> for ZnoError {
    #[track_caller]
    fn from(err: sqlx::migrate::MigrateError) -> ZnoError {
        ZnoError::from_components(
            ErrorKind::SchemaMigrationFailed,
            Cow::Borrowed("Applying database migrations failed"),
            Some(Cow::Owned(err.to_string())),
        )
        .with_source(err)
    }
}

/// Classifies [`sqlx::Error`]s, separating integrity violations from transport failures.
impl From<sqlx::Error> for ZnoError {
    #[track_caller]
    fn from(err: sqlx::Error) -> ZnoError {
        let (kind, description) = match &err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => (
                    ErrorKind::ConstraintViolation,
                    "PostgreSQL unique constraint violation",
                ),
                sqlx::error::ErrorKind::ForeignKeyViolation => (
                    ErrorKind::ConstraintViolation,
                    "PostgreSQL foreign key violation",
                ),
                sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => (
                    ErrorKind::ConstraintViolation,
                    "PostgreSQL constraint violation",
                ),
                _ => (ErrorKind::QueryFailed, "PostgreSQL query failed"),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => {
                (ErrorKind::ConnectionFailed, "PostgreSQL connection failed")
            }
            sqlx::Error::Configuration(_) => {
                (ErrorKind::ConfigError, "PostgreSQL connection is misconfigured")
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => (
                ErrorKind::ConversionError,
                "PostgreSQL value could not be decoded",
            ),
            sqlx::Error::RowNotFound => (ErrorKind::QueryFailed, "PostgreSQL row not found"),
            _ => (ErrorKind::QueryFailed, "PostgreSQL operation failed"),
        };

        ZnoError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(err.to_string())),
        )
        .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zno_error;

    #[test]
    fn single_error_keeps_kind_and_detail() {
        let err = zno_error!(
            ErrorKind::ConstraintViolation,
            "Duplicate key",
            "out_id X1 already exists"
        );

        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(err.detail(), Some("out_id X1 already exists"));
        assert!(err.to_string().contains("Duplicate key"));
    }

    #[test]
    fn detail_lines_are_indented_under_the_description() {
        let err = zno_error!(ErrorKind::IoError, "Disk gone", "first\nsecond");

        let rendered = err.to_string();

        assert!(rendered.starts_with("[IoError] Disk gone @ "));
        assert!(rendered.ends_with("\n  first\n  second"));
    }

    #[test]
    fn parse_errors_are_conversion_errors() {
        let err: ZnoError = "x1".parse::<i64>().unwrap_err().into();

        assert_eq!(err.kind(), ErrorKind::ConversionError);
        assert!(std::error::Error::source(&err).is_some());
    }
}
