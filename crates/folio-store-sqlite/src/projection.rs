//! Viewer-relative projections.
//!
//! Every function reads inside the caller's transaction, so a view and the
//! counts inside it come from one snapshot.

use folio_core::{
  Viewer,
  article::{Article, ArticleFilter, Page},
  comment::Comment,
  projection::{self, ArticleList, ArticleView, CommentView, Profile},
  user::{User, UserId},
};
use rusqlite::{Transaction, params};

use crate::{
  Result,
  encode::{ARTICLE_COLUMNS, RawArticle},
  social, tags, users,
};

/// `favorited` filter value that matches no user.
const NO_USER: i64 = -1;

fn following(tx: &Transaction<'_>, viewer: Viewer, target: UserId) -> Result<bool> {
  match viewer.user_id() {
    Some(me) => social::is_following(tx, me, target),
    None => Ok(false),
  }
}

pub(crate) fn profile(tx: &Transaction<'_>, user: &User, viewer: Viewer) -> Result<Profile> {
  Ok(Profile::of(user, following(tx, viewer, user.id)?))
}

pub(crate) fn article_view(
  tx: &Transaction<'_>,
  article: Article,
  viewer: Viewer,
) -> Result<ArticleView> {
  let author = users::require_by_id(tx, article.author_id)?;
  let author = profile(tx, &author, viewer)?;
  article_view_with_author(tx, article, viewer, author)
}

fn article_view_with_author(
  tx: &Transaction<'_>,
  article: Article,
  viewer: Viewer,
  author: Profile,
) -> Result<ArticleView> {
  let tag_list = projection::tag_list(tags::names_for_article(tx, article.id)?);
  let favorited = match viewer.user_id() {
    Some(me) => social::is_favorited(tx, me, article.id)?,
    None => false,
  };
  let favorites_count = social::favorites_count(tx, article.id)?;

  Ok(ArticleView {
    slug: article.slug,
    title: article.title,
    description: article.description,
    body: article.body,
    tag_list,
    created_at: article.created_at,
    updated_at: article.updated_at,
    favorited,
    favorites_count,
    author,
  })
}

pub(crate) fn comment_view(
  tx: &Transaction<'_>,
  comment: Comment,
  viewer: Viewer,
) -> Result<CommentView> {
  let author = users::require_by_id(tx, comment.author_id)?;
  Ok(CommentView {
    id:         comment.id,
    body:       comment.body,
    created_at: comment.created_at,
    updated_at: comment.updated_at,
    author:     profile(tx, &author, viewer)?,
  })
}

// ─── Listings ────────────────────────────────────────────────────────────────

/// Shared WHERE clause: `?1` tag name, `?2` author username, `?3` favoriting
/// user id. A NULL parameter disables its filter.
const LIST_FILTER: &str = "
  FROM articles a
  JOIN users u ON u.user_id = a.author_id
  WHERE (?1 IS NULL OR EXISTS (
          SELECT 1 FROM article_tags atg JOIN tags t ON t.tag_id = atg.tag_id
          WHERE atg.article_id = a.article_id AND t.name = ?1))
    AND (?2 IS NULL OR u.username = ?2)
    AND (?3 IS NULL OR EXISTS (
          SELECT 1 FROM favorites f
          WHERE f.article_id = a.article_id AND f.user_id = ?3))";

/// Articles by authors `?1` follows.
const FEED_FILTER: &str = "
  FROM articles a
  JOIN follows fo ON fo.followed_id = a.author_id AND fo.follower_id = ?1";

pub(crate) fn list(
  tx: &Transaction<'_>,
  filter: &ArticleFilter,
  viewer: Viewer,
) -> Result<ArticleList> {
  let favorited_by = match &filter.favorited {
    Some(username) => Some(users::by_username(tx, username)?.map_or(NO_USER, |u| u.id.0)),
    None => None,
  };

  let articles_count: i64 = tx.query_row(
    &format!("SELECT COUNT(*) {LIST_FILTER}"),
    params![filter.tag, filter.author, favorited_by],
    |row| row.get(0),
  )?;

  let sql = format!(
    "SELECT {ARTICLE_COLUMNS} {LIST_FILTER}
     ORDER BY a.created_at DESC, a.article_id DESC
     LIMIT ?4 OFFSET ?5"
  );
  let rows = {
    let mut stmt = tx.prepare(&sql)?;
    stmt
      .query_map(
        params![filter.tag, filter.author, favorited_by, filter.page.limit, filter.page.offset],
        RawArticle::from_row,
      )?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let articles = rows
    .into_iter()
    .map(|raw| -> Result<ArticleView> { article_view(tx, raw.into_article()?, viewer) })
    .collect::<Result<Vec<_>>>()?;

  Ok(ArticleList { articles, articles_count: articles_count.unsigned_abs() })
}

/// Articles by authors `me` follows. `following` is true on every row.
pub(crate) fn feed(tx: &Transaction<'_>, me: UserId, page: Page) -> Result<ArticleList> {
  let articles_count: i64 = tx.query_row(
    &format!("SELECT COUNT(*) {FEED_FILTER}"),
    params![me.0],
    |row| row.get(0),
  )?;

  let sql = format!(
    "SELECT {ARTICLE_COLUMNS} {FEED_FILTER}
     ORDER BY a.created_at DESC, a.article_id DESC
     LIMIT ?2 OFFSET ?3"
  );
  let rows = {
    let mut stmt = tx.prepare(&sql)?;
    stmt
      .query_map(params![me.0, page.limit, page.offset], RawArticle::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let viewer = Viewer::User(me);
  let articles = rows
    .into_iter()
    .map(|raw| -> Result<ArticleView> {
      let article = raw.into_article()?;
      let author = users::require_by_id(tx, article.author_id)?;
      article_view_with_author(tx, article, viewer, Profile::of(&author, true))
    })
    .collect::<Result<Vec<_>>>()?;

  Ok(ArticleList { articles, articles_count: articles_count.unsigned_abs() })
}
