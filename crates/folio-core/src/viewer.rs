//! The identity a request acts on behalf of.

use crate::{Error, Result, user::UserId};

/// Either an authenticated user or nobody.
///
/// The core never sees credentials; the API layer resolves them to a
/// [`Viewer`] before calling into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
  #[default]
  Anonymous,
  User(UserId),
}

impl Viewer {
  pub fn user_id(self) -> Option<UserId> {
    match self {
      Self::Anonymous => None,
      Self::User(id) => Some(id),
    }
  }

  /// The user id, or [`Error::Unauthorized`] for anonymous viewers.
  pub fn require(self) -> Result<UserId> { self.user_id().ok_or(Error::Unauthorized) }
}

impl From<UserId> for Viewer {
  fn from(id: UserId) -> Self { Self::User(id) }
}

impl From<Option<UserId>> for Viewer {
  fn from(id: Option<UserId>) -> Self { id.map_or(Self::Anonymous, Self::User) }
}
