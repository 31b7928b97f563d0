//! Handlers for `/profiles/{username}` endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use folio_core::{projection::Profile, store::ConduitStore};
use serde::Serialize;

use crate::{
  AppState,
  auth::{CurrentUser, MaybeViewer},
  error::ApiError,
};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
  pub profile: Profile,
}

/// `GET /profiles/{username}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  MaybeViewer(viewer): MaybeViewer,
  Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let profile = state
    .store
    .profile(&username, viewer)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ProfileResponse { profile }))
}

/// `POST /profiles/{username}/follow`. Following twice is a conflict.
pub async fn follow<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let profile = state
    .store
    .follow(me.id, &username)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ProfileResponse { profile }))
}

/// `DELETE /profiles/{username}/follow`
pub async fn unfollow<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let profile = state
    .store
    .unfollow(me.id, &username)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ProfileResponse { profile }))
}
