//! Handlers for `/articles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/articles` | `?tag=&author=&favorited=&limit=&offset=` |
//! | `GET`  | `/articles/feed` | Requires a token |
//! | `POST` | `/articles` | Body: `{"article":{title,description,body,tagList}}` |
//! | `GET`  | `/articles/{slug}` | 404 if not found |
//! | `PUT`  | `/articles/{slug}` | Author only; a new title changes the slug |
//! | `POST`/`DELETE` | `/articles/{slug}/favorite` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  Patch,
  article::{ArticleChanges, ArticleFilter, NewArticle, Page},
  projection::{ArticleList, ArticleView},
  store::ConduitStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{CurrentUser, MaybeViewer},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
  pub article: T,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
  pub article: ArticleView,
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub tag:       Option<String>,
  pub author:    Option<String>,
  pub favorited: Option<String>,
  pub limit:     Option<u32>,
  pub offset:    Option<u32>,
}

/// `GET /articles`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  MaybeViewer(viewer): MaybeViewer,
  Query(params): Query<ListParams>,
) -> Result<Json<ArticleList>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let filter = ArticleFilter {
    tag:       params.tag,
    author:    params.author,
    favorited: params.favorited,
    page:      Page::new(params.limit, params.offset),
  };
  let list = state
    .store
    .list_articles(&filter, viewer)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(list))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub limit:  Option<u32>,
  pub offset: Option<u32>,
}

/// `GET /articles/feed`
pub async fn feed<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Query(params): Query<PageParams>,
) -> Result<Json<ArticleList>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let list = state
    .store
    .feed(me.id.into(), Page::new(params.limit, params.offset))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(list))
}

// ─── Single article ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  #[serde(default)]
  pub title:       String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub body:        String,
  #[serde(default)]
  pub tag_list:    Vec<String>,
}

/// `POST /articles`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Json(Envelope { article: body }): Json<Envelope<CreateBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let input = NewArticle {
    title:       body.title,
    description: body.description,
    body:        body.body,
    tags:        body.tag_list,
  };
  let article = state
    .store
    .create_article(me.id, input)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(slug = %article.slug, author = %me.id, "article created");
  Ok((StatusCode::CREATED, Json(ArticleResponse { article })))
}

/// `GET /articles/{slug}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  MaybeViewer(viewer): MaybeViewer,
  Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let article = state
    .store
    .article(&slug, viewer)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ArticleResponse { article }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  #[serde(default)]
  pub title:       Patch<String>,
  #[serde(default)]
  pub description: Patch<String>,
  #[serde(default)]
  pub body:        Patch<String>,
}

/// `PUT /articles/{slug}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Path(slug): Path<String>,
  Json(Envelope { article: body }): Json<Envelope<UpdateBody>>,
) -> Result<Json<ArticleResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let changes = ArticleChanges {
    title:       body.title,
    description: body.description,
    body:        body.body,
  };
  let article = state
    .store
    .update_article(&slug, me.id, changes)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ArticleResponse { article }))
}

// ─── Favorites ───────────────────────────────────────────────────────────────

/// `POST /articles/{slug}/favorite`
pub async fn favorite<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let article = state
    .store
    .favorite(me.id, &slug)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ArticleResponse { article }))
}

/// `DELETE /articles/{slug}/favorite`. 404 when the article was not favorited.
pub async fn unfavorite<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let article = state
    .store
    .unfavorite(me.id, &slug)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ArticleResponse { article }))
}
