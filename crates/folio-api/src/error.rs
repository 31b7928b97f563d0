//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store backend error through the core taxonomy.
  pub fn from_store<E>(err: E) -> Self
  where
    E: Into<folio_core::Error>,
  {
    let core: folio_core::Error = err.into();
    core.into()
  }

  pub fn internal<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(err))
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Forbidden(_) => StatusCode::FORBIDDEN,
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<folio_core::Error> for ApiError {
  fn from(err: folio_core::Error) -> Self {
    use folio_core::Error as E;
    match err {
      E::Validation(m) => Self::Validation(m),
      e @ E::NotFound(_) => Self::NotFound(e.to_string()),
      E::Conflict(m) => Self::Conflict(m),
      E::Forbidden(m) => Self::Forbidden(m),
      E::Unauthorized => Self::Unauthorized,
      E::Store(e) => Self::Internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      Self::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        "internal server error".to_owned()
      }
      other => other.to_string(),
    };
    (status, Json(json!({ "errors": { "body": [message] } }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn taxonomy_maps_to_status_codes() {
    let cases = [
      (folio_core::Error::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
      (folio_core::Error::not_found("article `x`"), StatusCode::NOT_FOUND),
      (folio_core::Error::conflict("x"), StatusCode::CONFLICT),
      (folio_core::Error::forbidden("x"), StatusCode::FORBIDDEN),
      (folio_core::Error::Unauthorized, StatusCode::UNAUTHORIZED),
      (
        folio_core::Error::store(std::io::Error::other("disk")),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), status);
    }
  }

  #[test]
  fn not_found_message_names_the_entity() {
    let err = ApiError::from(folio_core::Error::not_found("article `x`"));
    assert_eq!(err.to_string(), "article `x` not found");
  }
}
