//! Encoding and decoding helpers between Folio domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! and a `Z` suffix, so lexical order equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use folio_core::{
  article::{Article, ArticleId},
  comment::{Comment, CommentId},
  user::{User, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str =
  "user_id, username, email, password_hash, bio, image, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       i64,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub bio:           Option<String>,
  pub image:         Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      bio:           row.get(4)?,
      image:         row.get(5)?,
      created_at:    row.get(6)?,
      updated_at:    row.get(7)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            UserId(self.user_id),
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      bio:           self.bio,
      image:         self.image,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawArticle::from_row`], qualified for the `a` alias.
pub const ARTICLE_COLUMNS: &str = "a.article_id, a.slug, a.title, a.description, a.body,
   a.author_id, a.created_at, a.updated_at";

/// Raw values read directly from an `articles` row.
pub struct RawArticle {
  pub article_id:  i64,
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub author_id:   i64,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawArticle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:  row.get(0)?,
      slug:        row.get(1)?,
      title:       row.get(2)?,
      description: row.get(3)?,
      body:        row.get(4)?,
      author_id:   row.get(5)?,
      created_at:  row.get(6)?,
      updated_at:  row.get(7)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      id:          ArticleId(self.article_id),
      slug:        self.slug,
      title:       self.title,
      description: self.description,
      body:        self.body,
      author_id:   UserId(self.author_id),
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawComment::from_row`].
pub const COMMENT_COLUMNS: &str =
  "comment_id, body, article_id, author_id, created_at, updated_at";

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: i64,
  pub body:       String,
  pub article_id: i64,
  pub author_id:  i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      body:       row.get(1)?,
      article_id: row.get(2)?,
      author_id:  row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:         CommentId(self.comment_id),
      body:       self.body,
      article_id: ArticleId(self.article_id),
      author_id:  UserId(self.author_id),
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_have_fixed_width_and_sort_lexically() {
    let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let late = early + chrono::Duration::microseconds(1_500);
    let (a, b) = (encode_dt(early), encode_dt(late));
    assert_eq!(a, "2024-01-01T00:00:00.000000Z");
    assert_eq!(a.len(), b.len());
    assert!(a < b);
    assert_eq!(decode_dt(&b).unwrap(), late);
  }

  #[test]
  fn decode_rejects_garbage() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
