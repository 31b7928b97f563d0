//! Error type for `folio-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] folio_core::Error),

  /// The connection thread is gone or refused the call.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The caller stopped waiting before the unit of work committed.
  #[error("unit of work `{0}` cancelled before commit")]
  Cancelled(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Whether `err` is a UNIQUE or PRIMARY KEY constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
  match err {
    rusqlite::Error::SqliteFailure(e, _) => {
      e.code == rusqlite::ErrorCode::ConstraintViolation
        && matches!(
          e.extended_code,
          rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
    _ => false,
  }
}

pub(crate) trait ConstraintExt<T> {
  /// Surface a uniqueness violation as [`folio_core::Error::Conflict`].
  fn conflict_as<F>(self, msg: F) -> Result<T>
  where
    F: FnOnce() -> String;
}

impl<T> ConstraintExt<T> for rusqlite::Result<T> {
  fn conflict_as<F>(self, msg: F) -> Result<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|err| {
      if is_unique_violation(&err) {
        Error::Core(folio_core::Error::Conflict(msg()))
      } else {
        Error::Sqlite(err)
      }
    })
  }
}

impl From<Error> for folio_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      Error::Sqlite(ref e) if is_unique_violation(e) => Self::Conflict(e.to_string()),
      other => Self::store(other),
    }
  }
}
