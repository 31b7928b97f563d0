//! Articles, their write commands, and listing filters.
//!
//! The slug is the external key; [`ArticleId`] never leaves the store.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Patch, Result, user::UserId};

/// Default page size for listings.
pub const DEFAULT_LIMIT: u32 = 20;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TagId(pub i64);

/// A stored article row, without tags or viewer-relative data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
  pub id:          ArticleId,
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub author_id:   UserId,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

// ─── Commands ────────────────────────────────────────────────────────────────

/// Input for article creation.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
  pub title:       String,
  pub description: String,
  pub body:        String,
  /// Requested tag names in caller order; may repeat.
  pub tags:        Vec<String>,
}

impl NewArticle {
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("title", &self.title),
      ("description", &self.description),
      ("body", &self.body),
    ] {
      if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
      }
    }
    if self.tags.iter().any(|t| t.is_empty()) {
      return Err(Error::validation("tag names cannot be empty"));
    }
    Ok(())
  }

  /// The requested tags with exact duplicates removed.
  pub fn tag_set(&self) -> BTreeSet<String> { self.tags.iter().cloned().collect() }
}

/// Partial update of an article. Only these three fields are mutable.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
  /// A new title also re-keys the article under a freshly generated slug.
  pub title:       Patch<String>,
  pub description: Patch<String>,
  pub body:        Patch<String>,
}

impl ArticleChanges {
  pub fn validate(&self) -> Result<()> {
    self.title.require_text("title")?;
    self.description.require_text("description")?;
    self.body.require_text("body")?;
    Ok(())
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Offset/limit window over a most-recent-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub limit:  u32,
  pub offset: u32,
}

impl Default for Page {
  fn default() -> Self { Self { limit: DEFAULT_LIMIT, offset: 0 } }
}

impl Page {
  pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
    Self {
      limit:  limit.unwrap_or(DEFAULT_LIMIT),
      offset: offset.unwrap_or(0),
    }
  }
}

/// Filters for [`ConduitStore::list_articles`](crate::store::ConduitStore::list_articles).
/// All supplied filters must match.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
  pub tag:       Option<String>,
  /// Author username.
  pub author:    Option<String>,
  /// Username of a user who favorited the article.
  pub favorited: Option<String>,
  pub page:      Page,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid() -> NewArticle {
    NewArticle {
      title:       "How to train your dragon".into(),
      description: "Ever wonder how?".into(),
      body:        "You have to believe".into(),
      tags:        vec!["dragons".into(), "training".into()],
    }
  }

  #[test]
  fn new_article_requires_text_fields() {
    assert!(valid().validate().is_ok());
    for broken in [
      NewArticle { title: "".into(), ..valid() },
      NewArticle { description: "  ".into(), ..valid() },
      NewArticle { body: "".into(), ..valid() },
    ] {
      assert!(matches!(broken.validate(), Err(Error::Validation(_))));
    }
  }

  #[test]
  fn tags_are_optional_but_not_blank() {
    assert!(NewArticle { tags: vec![], ..valid() }.validate().is_ok());
    let blank = NewArticle { tags: vec!["ok".into(), "".into()], ..valid() };
    assert!(matches!(blank.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn tag_set_dedupes_case_sensitively() {
    let a = NewArticle {
      tags: vec!["b".into(), "a".into(), "a".into(), "A".into()],
      ..valid()
    };
    let set: Vec<_> = a.tag_set().into_iter().collect();
    assert_eq!(set, ["A", "a", "b"]);
  }

  #[test]
  fn changes_reject_clearing_required_fields() {
    let c = ArticleChanges { body: Patch::Null, ..Default::default() };
    assert!(matches!(c.validate(), Err(Error::Validation(_))));
    let c = ArticleChanges { title: Patch::Value("".into()), ..Default::default() };
    assert!(matches!(c.validate(), Err(Error::Validation(_))));
    assert!(ArticleChanges::default().validate().is_ok());
  }

  #[test]
  fn page_defaults() {
    assert_eq!(Page::new(None, None), Page { limit: 20, offset: 0 });
    assert_eq!(Page::new(Some(5), Some(10)), Page { limit: 5, offset: 10 });
  }
}
