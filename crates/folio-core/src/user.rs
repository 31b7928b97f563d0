//! Users and the commands that create or change them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Patch, Result};

/// Internal numeric user identifier. Immutable once assigned.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A stored user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id:            UserId,
  pub username:      String,
  pub email:         String,
  /// PHC string; hashing happens outside the core.
  pub password_hash: String,
  pub bio:           Option<String>,
  pub image:         Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input for registration.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
}

impl NewUser {
  pub fn validate(&self) -> Result<()> {
    if self.username.trim().is_empty() {
      return Err(Error::validation("username cannot be empty"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::validation("email cannot be empty"));
    }
    if self.password_hash.is_empty() {
      return Err(Error::validation("password cannot be empty"));
    }
    Ok(())
  }
}

/// Partial update of the current user.
///
/// `email`, `username` and `password_hash` may be replaced but never cleared.
/// `bio` and `image` are cleared by an explicit `null`.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
  pub email:         Patch<String>,
  pub username:      Patch<String>,
  pub password_hash: Patch<String>,
  pub bio:           Patch<String>,
  pub image:         Patch<String>,
}

impl UserChanges {
  pub fn validate(&self) -> Result<()> {
    self.email.require_text("email")?;
    self.username.require_text("username")?;
    self.password_hash.require_text("password")?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registration_requires_every_field() {
    let ok = NewUser {
      username:      "jake".into(),
      email:         "jake@jake.jake".into(),
      password_hash: "$argon2id$stub".into(),
    };
    assert!(ok.validate().is_ok());

    let blank_name = NewUser { username: " ".into(), ..ok.clone() };
    assert!(matches!(blank_name.validate(), Err(Error::Validation(_))));

    let blank_email = NewUser { email: String::new(), ..ok };
    assert!(matches!(blank_email.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn clearing_bio_is_allowed_but_not_email() {
    let clear_bio = UserChanges { bio: Patch::Null, ..Default::default() };
    assert!(clear_bio.validate().is_ok());

    let clear_email = UserChanges { email: Patch::Null, ..Default::default() };
    assert!(matches!(clear_email.validate(), Err(Error::Validation(_))));
  }
}
