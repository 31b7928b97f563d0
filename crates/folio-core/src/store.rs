//! The `ConduitStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.
//!
//! Every write runs as one unit of work: either all of its steps commit or
//! none do. Methods that return a view read it back in the same unit, so the
//! result reflects the post-write state.

use std::future::Future;

use crate::{
  Viewer,
  article::{ArticleChanges, ArticleFilter, NewArticle, Page},
  comment::CommentId,
  projection::{ArticleList, ArticleView, CommentView, Profile},
  user::{NewUser, User, UserChanges, UserId},
};

/// Abstraction over a Folio store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ConduitStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Duplicate username or email is a conflict.
  fn register(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn user_by_id(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by email, used for login. Returns `None` if not found.
  fn user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Apply a partial update to a user and return the stored result.
  fn update_user(
    &self,
    id: UserId,
    changes: UserChanges,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Social graph ──────────────────────────────────────────────────────

  /// The profile of `username` as seen by `viewer`.
  fn profile<'a>(
    &'a self,
    username: &'a str,
    viewer: Viewer,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + 'a;

  /// Whether `follower` follows `followed`.
  fn is_following(
    &self,
    follower: UserId,
    followed: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Add a follow edge. Following someone already followed is a conflict.
  fn follow<'a>(
    &'a self,
    follower: UserId,
    username: &'a str,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + 'a;

  /// Remove a follow edge. Removing a missing edge succeeds.
  fn unfollow<'a>(
    &'a self,
    follower: UserId,
    username: &'a str,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + 'a;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Create an article with its tags under a freshly generated slug.
  fn create_article(
    &self,
    author: UserId,
    input: NewArticle,
  ) -> impl Future<Output = Result<ArticleView, Self::Error>> + Send + '_;

  fn article<'a>(
    &'a self,
    slug: &'a str,
    viewer: Viewer,
  ) -> impl Future<Output = Result<ArticleView, Self::Error>> + Send + 'a;

  /// Apply a partial update. Only the author may update; a new title
  /// re-keys the article under a new slug.
  fn update_article<'a>(
    &'a self,
    slug: &'a str,
    actor: UserId,
    changes: ArticleChanges,
  ) -> impl Future<Output = Result<ArticleView, Self::Error>> + Send + 'a;

  /// Most-recent-first listing matching every supplied filter.
  fn list_articles<'a>(
    &'a self,
    filter: &'a ArticleFilter,
    viewer: Viewer,
  ) -> impl Future<Output = Result<ArticleList, Self::Error>> + Send + 'a;

  /// Articles by authors the viewer follows. Anonymous viewers are rejected.
  fn feed(
    &self,
    viewer: Viewer,
    page: Page,
  ) -> impl Future<Output = Result<ArticleList, Self::Error>> + Send + '_;

  /// Favorite an article. An unknown or already-favorited article is not found.
  fn favorite<'a>(
    &'a self,
    user: UserId,
    slug: &'a str,
  ) -> impl Future<Output = Result<ArticleView, Self::Error>> + Send + 'a;

  /// Unfavorite an article. A missing edge is not found.
  fn unfavorite<'a>(
    &'a self,
    user: UserId,
    slug: &'a str,
  ) -> impl Future<Output = Result<ArticleView, Self::Error>> + Send + 'a;

  // ── Comments ──────────────────────────────────────────────────────────

  fn add_comment<'a>(
    &'a self,
    slug: &'a str,
    author: UserId,
    body: String,
  ) -> impl Future<Output = Result<CommentView, Self::Error>> + Send + 'a;

  /// Comments on an article, oldest first.
  fn comments<'a>(
    &'a self,
    slug: &'a str,
    viewer: Viewer,
  ) -> impl Future<Output = Result<Vec<CommentView>, Self::Error>> + Send + 'a;

  /// Delete a comment. Only its author may delete it.
  fn delete_comment<'a>(
    &'a self,
    slug: &'a str,
    id: CommentId,
    actor: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Tags ──────────────────────────────────────────────────────────────

  /// The whole tag vocabulary, sorted.
  fn tags(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
