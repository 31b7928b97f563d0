//! Comments, owned by an article.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, article::ArticleId, user::UserId};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
  pub id:         CommentId,
  pub body:       String,
  pub article_id: ArticleId,
  pub author_id:  UserId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Reject an empty comment body before any store access.
pub fn validate_body(body: &str) -> Result<()> {
  if body.trim().is_empty() {
    return Err(Error::validation("comment body cannot be empty"));
  }
  Ok(())
}
