//! Comment rows.

use chrono::{DateTime, Utc};
use folio_core::{
  article::ArticleId,
  comment::{Comment, CommentId},
  user::UserId,
};
use rusqlite::{OptionalExtension as _, Transaction, params};

use crate::{
  Result,
  encode::{COMMENT_COLUMNS, RawComment, encode_dt},
};

pub(crate) fn insert(
  tx:      &Transaction<'_>,
  article: ArticleId,
  author:  UserId,
  body:    &str,
  now:     DateTime<Utc>,
) -> Result<Comment> {
  tx.execute(
    "INSERT INTO comments (body, article_id, author_id, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?4)",
    params![body, article.0, author.0, encode_dt(now)],
  )?;
  let id = CommentId(tx.last_insert_rowid());
  by_id(tx, id)?.ok_or_else(|| folio_core::Error::not_found(format!("comment {id}")).into())
}

pub(crate) fn by_id(tx: &Transaction<'_>, id: CommentId) -> Result<Option<Comment>> {
  let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?1");
  let raw = tx
    .query_row(&sql, params![id.0], RawComment::from_row)
    .optional()?;
  raw.map(RawComment::into_comment).transpose()
}

/// Comments on `article`, oldest first.
pub(crate) fn for_article(tx: &Transaction<'_>, article: ArticleId) -> Result<Vec<Comment>> {
  let sql = format!(
    "SELECT {COMMENT_COLUMNS} FROM comments
     WHERE article_id = ?1
     ORDER BY created_at ASC, comment_id ASC"
  );
  let mut stmt = tx.prepare(&sql)?;
  let raws = stmt
    .query_map(params![article.0], RawComment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawComment::into_comment).collect()
}

/// Delete comment `id` on `article`. Only its author may do so.
pub(crate) fn delete(
  tx:      &Transaction<'_>,
  article: ArticleId,
  id:      CommentId,
  actor:   UserId,
) -> Result<()> {
  let comment = by_id(tx, id)?
    .filter(|c| c.article_id == article)
    .ok_or_else(|| folio_core::Error::not_found(format!("comment {id}")))?;
  if comment.author_id != actor {
    return Err(folio_core::Error::forbidden(format!("only the author may delete comment {id}")).into());
  }
  tx.execute("DELETE FROM comments WHERE comment_id = ?1", params![id.0])?;
  Ok(())
}
