//! Handlers for registration, login and the current user.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Register; returns the user with a fresh token |
//! | `POST` | `/users/login` | 401 on unknown email or wrong password |
//! | `GET`  | `/user` | Requires a token |
//! | `PUT`  | `/user` | Partial update; `null` clears `bio`/`image` |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  Patch,
  store::ConduitStore,
  user::{NewUser, User, UserChanges},
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{CurrentUser, hash_password, verify_password},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
  pub user: T,
}

/// The authenticated user as returned to its owner.
#[derive(Debug, Serialize)]
pub struct UserBody {
  pub email:    String,
  pub token:    String,
  pub username: String,
  pub bio:      Option<String>,
  pub image:    Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
  pub user: UserBody,
}

impl UserResponse {
  fn new(user: User, token: String) -> Self {
    Self {
      user: UserBody {
        email: user.email,
        token,
        username: user.username,
        bio: user.bio,
        image: user.image,
      },
    }
  }
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

/// `POST /users`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(Envelope { user: body }): Json<Envelope<RegisterBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let password_hash = hash_password(&body.password)?;
  let user = state
    .store
    .register(NewUser { username: body.username, email: body.email, password_hash })
    .await
    .map_err(ApiError::from_store)?;
  let token = state.auth.issue_token(user.id)?;
  tracing::info!(user = %user.id, "registered");
  Ok((StatusCode::CREATED, Json(UserResponse::new(user, token))))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /users/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(Envelope { user: body }): Json<Envelope<LoginBody>>,
) -> Result<Json<UserResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let user = state
    .store
    .user_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Unauthorized)?;
  verify_password(&body.password, &user.password_hash)?;
  let token = state.auth.issue_token(user.id)?;
  Ok(Json(UserResponse::new(user, token)))
}

// ─── Current user ────────────────────────────────────────────────────────────

/// `GET /user`
pub async fn current<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
) -> Result<Json<UserResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let user = state
    .store
    .user_by_id(me.id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Unauthorized)?;
  Ok(Json(UserResponse::new(user, me.token)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  #[serde(default)]
  pub email:    Patch<String>,
  #[serde(default)]
  pub username: Patch<String>,
  #[serde(default)]
  pub password: Patch<String>,
  #[serde(default)]
  pub bio:      Patch<String>,
  #[serde(default)]
  pub image:    Patch<String>,
}

/// `PUT /user`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  me: CurrentUser,
  Json(Envelope { user: body }): Json<Envelope<UpdateBody>>,
) -> Result<Json<UserResponse>, ApiError>
where
  S: ConduitStore + Clone + 'static,
{
  let password_hash = match body.password {
    Patch::Value(password) => Patch::Value(hash_password(&password)?),
    Patch::Null => return Err(ApiError::Validation("password cannot be null".into())),
    Patch::Absent => Patch::Absent,
  };
  let changes = UserChanges {
    email: body.email,
    username: body.username,
    password_hash,
    bio: body.bio,
    image: body.image,
  };
  let user = state
    .store
    .update_user(me.id, changes)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(UserResponse::new(user, me.token)))
}
