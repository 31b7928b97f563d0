//! Viewer-relative read models.
//!
//! Nothing here is stored. `following`, `favorited` and `favorites_count` are
//! computed per request for one viewer and must not be cached across viewers.
//! Serialisation is a plain field mapping onto the wire format.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{comment::CommentId, user::User};

/// Public view of a user, relative to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
  pub username:  String,
  pub bio:       Option<String>,
  pub image:     Option<String>,
  /// The viewer follows this user. Always `false` for anonymous viewers.
  pub following: bool,
}

impl Profile {
  pub fn of(user: &User, following: bool) -> Self {
    Self {
      username: user.username.clone(),
      bio: user.bio.clone(),
      image: user.image.clone(),
      following,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
  pub slug:            String,
  pub title:           String,
  pub description:     String,
  pub body:            String,
  /// Deduplicated and sorted; see [`tag_list`].
  pub tag_list:        Vec<String>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  pub favorited:       bool,
  pub favorites_count: u64,
  pub author:          Profile,
}

/// One page of articles plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleList {
  pub articles:       Vec<ArticleView>,
  pub articles_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
  pub id:         CommentId,
  pub body:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub author:     Profile,
}

/// Deduplicate tag names and order them lexicographically, independent of
/// insertion order.
pub fn tag_list<I>(names: I) -> Vec<String>
where
  I: IntoIterator<Item = String>,
{
  names.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tag_list_sorts_and_dedupes() {
    let tags = tag_list(["b", "a", "a"].map(String::from));
    assert_eq!(tags, ["a", "b"]);
  }

  #[test]
  fn article_view_uses_camel_case_keys() {
    let view = ArticleView {
      slug:            "s".into(),
      title:           "t".into(),
      description:     "d".into(),
      body:            "b".into(),
      tag_list:        vec![],
      created_at:      Utc::now(),
      updated_at:      Utc::now(),
      favorited:       false,
      favorites_count: 0,
      author:          Profile {
        username:  "jake".into(),
        bio:       None,
        image:     None,
        following: false,
      },
    };
    let json = serde_json::to_value(&view).unwrap();
    assert!(json.get("tagList").is_some());
    assert!(json.get("favoritesCount").is_some());
    assert_eq!(json["author"]["following"], false);
  }
}
