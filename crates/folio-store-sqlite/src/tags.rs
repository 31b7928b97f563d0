//! Tag reconciliation.
//!
//! Maps requested tag names onto tag ids inside the caller's transaction and
//! creates the missing ones. Another writer may create the same tag between
//! our lookup and our insert; the UNIQUE(name) violation is absorbed by
//! re-reading the row that writer committed, never surfaced.
//!
//! Names match by exact, case-sensitive equality.

use std::collections::{BTreeMap, BTreeSet};

use folio_core::article::{ArticleId, TagId};
use rusqlite::{Transaction, params};

use crate::{Result, error::is_unique_violation};

/// Resolve every name in `names` to a tag id, creating tags as needed.
///
/// The result holds each input name exactly once.
pub(crate) fn reconcile(
  tx:    &Transaction<'_>,
  names: &BTreeSet<String>,
) -> Result<BTreeMap<String, TagId>> {
  let mut resolved = lookup(tx, names)?;
  for name in names {
    if !resolved.contains_key(name) {
      let id = create_or_fetch(tx, name)?;
      resolved.insert(name.clone(), id);
    }
  }
  Ok(resolved)
}

/// One batch query for every existing tag among `names`.
fn lookup(tx: &Transaction<'_>, names: &BTreeSet<String>) -> Result<BTreeMap<String, TagId>> {
  if names.is_empty() {
    return Ok(BTreeMap::new());
  }

  let placeholders = vec!["?"; names.len()].join(", ");
  let sql = format!("SELECT name, tag_id FROM tags WHERE name IN ({placeholders})");

  let mut stmt = tx.prepare(&sql)?;
  let found = stmt
    .query_map(rusqlite::params_from_iter(names.iter()), |row| {
      Ok((row.get::<_, String>(0)?, TagId(row.get(1)?)))
    })?
    .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
  Ok(found)
}

/// Insert `name`, or return the id of the row a concurrent writer created.
pub(crate) fn create_or_fetch(tx: &Transaction<'_>, name: &str) -> Result<TagId> {
  match tx.execute("INSERT INTO tags (name) VALUES (?1)", params![name]) {
    Ok(_) => Ok(TagId(tx.last_insert_rowid())),
    Err(err) if is_unique_violation(&err) => {
      tracing::debug!(tag = name, "tag already created by another writer; reusing it");
      let id = tx.query_row(
        "SELECT tag_id FROM tags WHERE name = ?1",
        params![name],
        |row| row.get(0),
      )?;
      Ok(TagId(id))
    }
    Err(err) => Err(err.into()),
  }
}

/// Tag names attached to `article`, sorted.
pub(crate) fn names_for_article(tx: &Transaction<'_>, article: ArticleId) -> Result<Vec<String>> {
  let mut stmt = tx.prepare_cached(
    "SELECT t.name
     FROM article_tags atg
     JOIN tags t ON t.tag_id = atg.tag_id
     WHERE atg.article_id = ?1
     ORDER BY t.name",
  )?;
  let names = stmt
    .query_map(params![article.0], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(names)
}

/// The whole vocabulary, sorted.
pub(crate) fn all(tx: &Transaction<'_>) -> Result<Vec<String>> {
  let mut stmt = tx.prepare("SELECT name FROM tags ORDER BY name")?;
  let names = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(names)
}
