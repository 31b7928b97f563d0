//! [`SqliteStore`], the SQLite implementation of [`ConduitStore`].

use std::path::Path;

use chrono::Utc;
use folio_core::{
  Viewer,
  article::{ArticleChanges, ArticleFilter, NewArticle, Page},
  comment::{self, CommentId},
  projection::{ArticleList, ArticleView, CommentView, Profile},
  slug,
  store::ConduitStore,
  user::{NewUser, User, UserChanges, UserId},
};

use crate::{
  Result, articles, comments, projection,
  schema::SCHEMA,
  social, tags,
  tx::{self, Access},
  users,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio store backed by a single SQLite file.
///
/// Cloning is cheap; every clone talks to the same connection thread, which
/// also serialises writers.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert an article under a caller-chosen slug, then reconcile and attach
  /// its tags, all in one unit of work.
  pub(crate) async fn create_article_with_slug(
    &self,
    author: UserId,
    slug: String,
    input: NewArticle,
  ) -> Result<ArticleView> {
    let now = Utc::now();
    tx::run(&self.conn, "create_article", Access::Write, move |tx| {
      let id = articles::insert(tx, author, &slug, &input, now)?;
      let tag_ids = tags::reconcile(tx, &input.tag_set())?;
      articles::associate_tags(tx, id, tag_ids.into_values())?;
      let article = articles::require_by_id(tx, id)?;
      projection::article_view(tx, article, Viewer::User(author))
    })
    .await
  }
}

impl ConduitStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn register(&self, input: NewUser) -> Result<User> {
    input.validate()?;
    let now = Utc::now();
    tx::run(&self.conn, "register", Access::Write, move |tx| {
      users::insert(tx, &input, now)
    })
    .await
  }

  async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
    tx::run(&self.conn, "user_by_id", Access::Read, move |tx| users::by_id(tx, id)).await
  }

  async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();
    tx::run(&self.conn, "user_by_email", Access::Read, move |tx| {
      users::by_email(tx, &email)
    })
    .await
  }

  async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User> {
    changes.validate()?;
    let now = Utc::now();
    tx::run(&self.conn, "update_user", Access::Write, move |tx| {
      users::update(tx, id, changes, now)
    })
    .await
  }

  // ── Social graph ──────────────────────────────────────────────────────

  async fn profile(&self, username: &str, viewer: Viewer) -> Result<Profile> {
    let username = username.to_owned();
    tx::run(&self.conn, "profile", Access::Read, move |tx| {
      let user = users::require_by_username(tx, &username)?;
      projection::profile(tx, &user, viewer)
    })
    .await
  }

  async fn is_following(&self, follower: UserId, followed: UserId) -> Result<bool> {
    tx::run(&self.conn, "is_following", Access::Read, move |tx| {
      social::is_following(tx, follower, followed)
    })
    .await
  }

  async fn follow(&self, follower: UserId, username: &str) -> Result<Profile> {
    let username = username.to_owned();
    tx::run(&self.conn, "follow", Access::Write, move |tx| {
      let followed = social::follow(tx, follower, &username)?;
      Ok(Profile::of(&followed, true))
    })
    .await
  }

  async fn unfollow(&self, follower: UserId, username: &str) -> Result<Profile> {
    let username = username.to_owned();
    tx::run(&self.conn, "unfollow", Access::Write, move |tx| {
      let followed = social::unfollow(tx, follower, &username)?;
      Ok(Profile::of(&followed, false))
    })
    .await
  }

  // ── Articles ──────────────────────────────────────────────────────────

  async fn create_article(&self, author: UserId, input: NewArticle) -> Result<ArticleView> {
    input.validate()?;
    let slug = slug::generate(&input.title);
    self.create_article_with_slug(author, slug, input).await
  }

  async fn article(&self, slug: &str, viewer: Viewer) -> Result<ArticleView> {
    let slug = slug.to_owned();
    tx::run(&self.conn, "article", Access::Read, move |tx| {
      let article = articles::require_by_slug(tx, &slug)?;
      projection::article_view(tx, article, viewer)
    })
    .await
  }

  async fn update_article(
    &self,
    slug: &str,
    actor: UserId,
    changes: ArticleChanges,
  ) -> Result<ArticleView> {
    changes.validate()?;
    let slug = slug.to_owned();
    let now = Utc::now();
    tx::run(&self.conn, "update_article", Access::Write, move |tx| {
      let article = articles::update(tx, &slug, actor, changes, now)?;
      projection::article_view(tx, article, Viewer::User(actor))
    })
    .await
  }

  async fn list_articles(&self, filter: &ArticleFilter, viewer: Viewer) -> Result<ArticleList> {
    let filter = filter.clone();
    tx::run(&self.conn, "list_articles", Access::Read, move |tx| {
      projection::list(tx, &filter, viewer)
    })
    .await
  }

  async fn feed(&self, viewer: Viewer, page: Page) -> Result<ArticleList> {
    let me = viewer.require()?;
    tx::run(&self.conn, "feed", Access::Read, move |tx| projection::feed(tx, me, page)).await
  }

  async fn favorite(&self, user: UserId, slug: &str) -> Result<ArticleView> {
    let slug = slug.to_owned();
    tx::run(&self.conn, "favorite", Access::Write, move |tx| {
      social::favorite(tx, user, &slug)?;
      let article = articles::require_by_slug(tx, &slug)?;
      projection::article_view(tx, article, Viewer::User(user))
    })
    .await
  }

  async fn unfavorite(&self, user: UserId, slug: &str) -> Result<ArticleView> {
    let slug = slug.to_owned();
    tx::run(&self.conn, "unfavorite", Access::Write, move |tx| {
      social::unfavorite(tx, user, &slug)?;
      let article = articles::require_by_slug(tx, &slug)?;
      projection::article_view(tx, article, Viewer::User(user))
    })
    .await
  }

  // ── Comments ──────────────────────────────────────────────────────────

  async fn add_comment(&self, slug: &str, author: UserId, body: String) -> Result<CommentView> {
    comment::validate_body(&body)?;
    let slug = slug.to_owned();
    let now = Utc::now();
    tx::run(&self.conn, "add_comment", Access::Write, move |tx| {
      let article = articles::require_by_slug(tx, &slug)?;
      let comment = comments::insert(tx, article.id, author, &body, now)?;
      projection::comment_view(tx, comment, Viewer::User(author))
    })
    .await
  }

  async fn comments(&self, slug: &str, viewer: Viewer) -> Result<Vec<CommentView>> {
    let slug = slug.to_owned();
    tx::run(&self.conn, "comments", Access::Read, move |tx| {
      let article = articles::require_by_slug(tx, &slug)?;
      comments::for_article(tx, article.id)?
        .into_iter()
        .map(|c| projection::comment_view(tx, c, viewer))
        .collect::<Result<Vec<_>>>()
    })
    .await
  }

  async fn delete_comment(&self, slug: &str, id: CommentId, actor: UserId) -> Result<()> {
    let slug = slug.to_owned();
    tx::run(&self.conn, "delete_comment", Access::Write, move |tx| {
      let article = articles::require_by_slug(tx, &slug)?;
      comments::delete(tx, article.id, id, actor)
    })
    .await
  }

  // ── Tags ──────────────────────────────────────────────────────────────

  async fn tags(&self) -> Result<Vec<String>> {
    tx::run(&self.conn, "tags", Access::Read, tags::all).await
  }
}
