//! JSON REST API for Folio.
//!
//! Exposes an axum [`Router`] backed by any [`folio_core::store::ConduitStore`].
//! Handlers only parse requests, resolve the viewer and shape responses;
//! every rule lives behind the store trait.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = folio_api::router(AppState { store, auth });
//! axum::serve(listener, app).await?;
//! ```

pub mod articles;
pub mod auth;
pub mod comments;
pub mod error;
pub mod profiles;
pub mod tags;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{delete, get, post},
};
use folio_core::store::ConduitStore;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use auth::AuthConfig;
pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ConduitStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router: `/health` plus everything under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ConduitStore + Clone + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", api_routes::<S>())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn api_routes<S>() -> Router<AppState<S>>
where
  S: ConduitStore + Clone + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::register::<S>))
    .route("/users/login", post(users::login::<S>))
    .route("/user", get(users::current::<S>).put(users::update::<S>))
    // Profiles
    .route("/profiles/{username}", get(profiles::get_one::<S>))
    .route(
      "/profiles/{username}/follow",
      post(profiles::follow::<S>).delete(profiles::unfollow::<S>),
    )
    // Articles
    .route("/articles", get(articles::list::<S>).post(articles::create::<S>))
    .route("/articles/feed", get(articles::feed::<S>))
    .route("/articles/{slug}", get(articles::get_one::<S>).put(articles::update::<S>))
    .route(
      "/articles/{slug}/favorite",
      post(articles::favorite::<S>).delete(articles::unfavorite::<S>),
    )
    // Comments
    .route(
      "/articles/{slug}/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    .route("/articles/{slug}/comments/{id}", delete(comments::delete::<S>))
    // Tags
    .route("/tags", get(tags::list::<S>))
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "UP" })) }

#[cfg(test)]
mod tests;
