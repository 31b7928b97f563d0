//! Token issuance and verification, password hashing, and the request
//! extractors that resolve an `Authorization: Token <jwt>` header into a
//! [`Viewer`].

use std::time::Duration;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use folio_core::{Viewer, store::ConduitStore, user::UserId};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Signing material for session tokens.
#[derive(Clone)]
pub struct AuthConfig {
  pub secret:    String,
  pub token_ttl: Duration,
}

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// The user id.
  pub sub: i64,
  /// Expiry, seconds since the Unix epoch.
  pub exp: i64,
}

impl AuthConfig {
  /// Sign an HS256 token for `user`.
  pub fn issue_token(&self, user: UserId) -> Result<String, ApiError> {
    let ttl = i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX);
    let claims = Claims {
      sub: user.0,
      exp: Utc::now().timestamp().saturating_add(ttl),
    };
    jsonwebtoken::encode(
      &Header::default(),
      &claims,
      &EncodingKey::from_secret(self.secret.as_bytes()),
    )
    .map_err(ApiError::internal)
  }

  /// Check signature and expiry and return the user the token was issued to.
  pub fn verify_token(&self, token: &str) -> Result<UserId, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
      token,
      &DecodingKey::from_secret(self.secret.as_bytes()),
      &Validation::default(),
    )
    .map_err(|e| {
      tracing::debug!(error = %e, "rejected token");
      ApiError::Unauthorized
    })?;
    Ok(UserId(data.claims.sub))
  }
}

/// Hash `password` into a PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(ApiError::Validation(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| ApiError::Internal(e.to_string().into()))?;
  Ok(hash.to_string())
}

/// Compare `password` against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> Result<(), ApiError> {
  let parsed = PasswordHash::new(phc).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)
}

/// The raw token from an `Authorization: Token <jwt>` header, if any.
///
/// A header with another scheme is treated as a bad token, not as absent.
fn bearer(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };
  let value = value.to_str().map_err(|_| ApiError::Unauthorized)?;
  value
    .strip_prefix("Token ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(Some)
    .ok_or(ApiError::Unauthorized)
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The viewer for optional-auth routes. No header means anonymous.
pub struct MaybeViewer(pub Viewer);

/// An authenticated caller, with the token it presented.
pub struct CurrentUser {
  pub id:    UserId,
  pub token: String,
}

impl<S> FromRequestParts<AppState<S>> for MaybeViewer
where
  S: ConduitStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match bearer(&parts.headers)? {
      Some(token) => Ok(Self(Viewer::User(state.auth.verify_token(token)?))),
      None => Ok(Self(Viewer::Anonymous)),
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: ConduitStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer(&parts.headers)?.ok_or(ApiError::Unauthorized)?;
    let id = state.auth.verify_token(token)?;
    Ok(Self { id, token: token.to_owned() })
  }
}
