//! `GET /tags`

use axum::{Json, extract::State};
use folio_core::store::ConduitStore;
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct TagsResponse {
  pub tags: Vec<String>,
}

pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<TagsResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let tags = state.store.tags().await.map_err(ApiError::from_store)?;
  Ok(Json(TagsResponse { tags }))
}
