//! Follow and favorite edges.
//!
//! Both edge tables carry a composite PRIMARY KEY, which is what resolves
//! concurrent duplicate inserts.
//!
//! Policies: re-following is a conflict, unfollowing a missing edge is a
//! no-op. Favoriting twice and unfavoriting a missing edge are both not found.

use folio_core::{
  article::ArticleId,
  user::{User, UserId},
};
use rusqlite::{Transaction, params};

use crate::{Result, error::ConstraintExt as _, users};

pub(crate) fn is_following(tx: &Transaction<'_>, follower: UserId, followed: UserId) -> Result<bool> {
  let found = tx
    .prepare_cached(
      "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2)",
    )?
    .query_row(params![follower.0, followed.0], |row| row.get(0))?;
  Ok(found)
}

/// Add a follow edge from `follower` to `username`; returns the followed user.
pub(crate) fn follow(tx: &Transaction<'_>, follower: UserId, username: &str) -> Result<User> {
  let target = users::require_by_username(tx, username)?;
  tx.execute(
    "INSERT INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
    params![follower.0, target.id.0],
  )
  .conflict_as(|| format!("already following `{username}`"))?;
  Ok(target)
}

/// Remove the follow edge if present; returns the formerly followed user.
pub(crate) fn unfollow(tx: &Transaction<'_>, follower: UserId, username: &str) -> Result<User> {
  let target = users::require_by_username(tx, username)?;
  let removed = tx.execute(
    "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
    params![follower.0, target.id.0],
  )?;
  if removed == 0 {
    tracing::debug!(%follower, username, "unfollow of a missing edge");
  }
  Ok(target)
}

pub(crate) fn is_favorited(tx: &Transaction<'_>, user: UserId, article: ArticleId) -> Result<bool> {
  let found = tx
    .prepare_cached(
      "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = ?1 AND article_id = ?2)",
    )?
    .query_row(params![user.0, article.0], |row| row.get(0))?;
  Ok(found)
}

pub(crate) fn favorites_count(tx: &Transaction<'_>, article: ArticleId) -> Result<u64> {
  let count: i64 = tx
    .prepare_cached("SELECT COUNT(*) FROM favorites WHERE article_id = ?1")?
    .query_row(params![article.0], |row| row.get(0))?;
  Ok(count.unsigned_abs())
}

/// Add a favorite edge keyed by slug. An unknown slug and an edge that
/// already exists both insert zero rows and are not found.
pub(crate) fn favorite(tx: &Transaction<'_>, user: UserId, slug: &str) -> Result<()> {
  let added = tx.execute(
    "INSERT OR IGNORE INTO favorites (user_id, article_id)
     SELECT ?1, article_id FROM articles WHERE slug = ?2",
    params![user.0, slug],
  )?;
  if added == 0 {
    return Err(folio_core::Error::not_found(format!("article `{slug}` to favorite")).into());
  }
  Ok(())
}

pub(crate) fn unfavorite(tx: &Transaction<'_>, user: UserId, slug: &str) -> Result<()> {
  let removed = tx.execute(
    "DELETE FROM favorites
     WHERE user_id = ?1
       AND article_id = (SELECT article_id FROM articles WHERE slug = ?2)",
    params![user.0, slug],
  )?;
  if removed == 0 {
    return Err(folio_core::Error::not_found(format!("favorite on `{slug}`")).into());
  }
  Ok(())
}
