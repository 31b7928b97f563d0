//! Handlers for `/articles/{slug}/comments` endpoints.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{comment::CommentId, projection::CommentView, store::ConduitStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{CurrentUser, MaybeViewer},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub comment: NewComment,
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
  #[serde(default)]
  pub body: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
  pub comment: CommentView,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
  pub comments: Vec<CommentView>,
}

/// `GET /articles/{slug}/comments`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  MaybeViewer(viewer): MaybeViewer,
  Path(slug): Path<String>,
) -> Result<Json<CommentsResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let comments = state
    .store
    .comments(&slug, viewer)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(CommentsResponse { comments }))
}

/// `POST /articles/{slug}/comments`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Path(slug): Path<String>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let comment = state
    .store
    .add_comment(&slug, me.id, body.comment.body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

/// `DELETE /articles/{slug}/comments/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Path((slug, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  state
    .store
    .delete_comment(&slug, CommentId(id), me.id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::OK)
}
