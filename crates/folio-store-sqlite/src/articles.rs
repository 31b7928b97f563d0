//! Article rows and their tag associations.

use chrono::{DateTime, Utc};
use folio_core::{
  Patch,
  article::{Article, ArticleChanges, ArticleId, NewArticle, TagId},
  slug,
  user::UserId,
};
use rusqlite::{OptionalExtension as _, Transaction, params};

use crate::{
  Result,
  encode::{ARTICLE_COLUMNS, RawArticle, encode_dt},
  error::{ConstraintExt as _, is_unique_violation},
};

/// Insert an article row under `slug`.
///
/// A taken slug is a conflict. It is not retried here; the caller decides
/// whether to regenerate.
pub(crate) fn insert(
  tx:     &Transaction<'_>,
  author: UserId,
  slug:   &str,
  input:  &NewArticle,
  now:    DateTime<Utc>,
) -> Result<ArticleId> {
  tx.execute(
    "INSERT INTO articles (slug, title, description, body, author_id, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    params![slug, input.title, input.description, input.body, author.0, encode_dt(now)],
  )
  .conflict_as(|| format!("an article with slug `{slug}` already exists"))?;

  Ok(ArticleId(tx.last_insert_rowid()))
}

fn find(tx: &Transaction<'_>, column: &str, value: &dyn rusqlite::ToSql) -> Result<Option<Article>> {
  let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.{column} = ?1");
  let raw = tx
    .query_row(&sql, [value], RawArticle::from_row)
    .optional()?;
  raw.map(RawArticle::into_article).transpose()
}

pub(crate) fn by_id(tx: &Transaction<'_>, id: ArticleId) -> Result<Option<Article>> {
  find(tx, "article_id", &id.0)
}

pub(crate) fn by_slug(tx: &Transaction<'_>, slug: &str) -> Result<Option<Article>> {
  find(tx, "slug", &slug)
}

pub(crate) fn require_by_slug(tx: &Transaction<'_>, slug: &str) -> Result<Article> {
  by_slug(tx, slug)?.ok_or_else(|| folio_core::Error::not_found(format!("article `{slug}`")).into())
}

pub(crate) fn require_by_id(tx: &Transaction<'_>, id: ArticleId) -> Result<Article> {
  by_id(tx, id)?.ok_or_else(|| folio_core::Error::not_found(format!("article {id}")).into())
}

/// Attach `tags` to `article`. Pairs that already exist count as attached.
pub(crate) fn associate_tags<I>(tx: &Transaction<'_>, article: ArticleId, tags: I) -> Result<()>
where
  I: IntoIterator<Item = TagId>,
{
  let mut stmt =
    tx.prepare_cached("INSERT INTO article_tags (article_id, tag_id) VALUES (?1, ?2)")?;
  for tag in tags {
    match stmt.execute(params![article.0, tag.0]) {
      Ok(_) => {}
      Err(err) if is_unique_violation(&err) => {}
      Err(err) => return Err(err.into()),
    }
  }
  Ok(())
}

/// Apply `changes` to the article at `slug` on behalf of `actor`.
///
/// Only the author may edit. A supplied title re-keys the row under a new
/// slug in the same statement as the field update. Returns the stored row,
/// whose `slug` is the new external key.
pub(crate) fn update(
  tx:      &Transaction<'_>,
  slug:    &str,
  actor:   UserId,
  changes: ArticleChanges,
  now:     DateTime<Utc>,
) -> Result<Article> {
  let current = require_by_slug(tx, slug)?;
  if current.author_id != actor {
    return Err(folio_core::Error::forbidden(format!("only the author may edit `{slug}`")).into());
  }

  let new_slug = match changes.title.as_ref() {
    Patch::Value(title) => slug::generate_at(title, now),
    Patch::Absent | Patch::Null => current.slug.clone(),
  };

  tx.execute(
    "UPDATE articles
     SET slug        = ?1,
         title       = COALESCE(?2, title),
         description = COALESCE(?3, description),
         body        = COALESCE(?4, body),
         updated_at  = ?5
     WHERE article_id = ?6",
    params![
      new_slug,
      changes.title.into_value(),
      changes.description.into_value(),
      changes.body.into_value(),
      encode_dt(now),
      current.id.0,
    ],
  )
  .conflict_as(|| format!("an article with slug `{new_slug}` already exists"))?;

  require_by_id(tx, current.id)
}
