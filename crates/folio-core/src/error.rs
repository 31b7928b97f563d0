//! Error taxonomy shared by every Folio layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input. Raised before the store is touched.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("{0} not found")]
  NotFound(String),

  /// A uniqueness constraint rejected the write.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The actor does not own the entity it tried to mutate.
  #[error("forbidden: {0}")]
  Forbidden(String),

  /// The operation needs a resolved viewer and none was supplied.
  #[error("authentication required")]
  Unauthorized,

  #[error("store failure: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

  pub fn not_found(what: impl Into<String>) -> Self { Self::NotFound(what.into()) }

  pub fn conflict(msg: impl Into<String>) -> Self { Self::Conflict(msg.into()) }

  pub fn forbidden(msg: impl Into<String>) -> Self { Self::Forbidden(msg.into()) }

  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
