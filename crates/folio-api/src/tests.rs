//! Router tests against an in-memory SQLite store.

use std::{sync::Arc, time::Duration};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use folio_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig {
      secret:    "test-secret".to_string(),
      token_ttl: Duration::from_secs(3600),
    }),
  }
}

async fn send(
  state:  &AppState<SqliteStore>,
  method: &str,
  uri:    &str,
  token:  Option<&str>,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
  }
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = router(state.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, json)
}

/// Register `name` and return its token.
async fn register(state: &AppState<SqliteStore>, name: &str) -> String {
  let (status, body) = send(
    state,
    "POST",
    "/api/users",
    None,
    Some(json!({ "user": {
      "username": name,
      "email": format!("{name}@example.com"),
      "password": "password123",
    }})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["user"]["token"].as_str().unwrap().to_string()
}

async fn publish(state: &AppState<SqliteStore>, token: &str, title: &str, tags: &[&str]) -> String {
  let (status, body) = send(
    state,
    "POST",
    "/api/articles",
    Some(token),
    Some(json!({ "article": {
      "title": title,
      "description": "desc",
      "body": "body",
      "tagList": tags,
    }})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["article"]["slug"].as_str().unwrap().to_string()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_up() {
  let state = make_state().await;
  let (status, body) = send(&state, "GET", "/health", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "status": "UP" }));
}

// ── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_login_and_fetch_current_user() {
  let state = make_state().await;
  register(&state, "jake").await;

  let (status, body) = send(
    &state,
    "POST",
    "/api/users/login",
    None,
    Some(json!({ "user": { "email": "jake@example.com", "password": "password123" } })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let token = body["user"]["token"].as_str().unwrap().to_string();

  let (status, body) = send(&state, "GET", "/api/user", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"]["username"], "jake");
  assert_eq!(body["user"]["token"], token.as_str());
  assert_eq!(body["user"]["bio"], Value::Null);
}

#[tokio::test]
async fn short_password_is_rejected() {
  let state = make_state().await;
  let (status, body) = send(
    &state,
    "POST",
    "/api/users",
    None,
    Some(json!({ "user": { "username": "jake", "email": "j@example.com", "password": "short" } })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body["errors"]["body"][0].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
  let state = make_state().await;
  register(&state, "jake").await;
  let (status, _) = send(
    &state,
    "POST",
    "/api/users",
    None,
    Some(json!({ "user": {
      "username": "jake",
      "email": "jake@example.com",
      "password": "password123",
    }})),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let state = make_state().await;
  register(&state, "jake").await;
  let (status, _) = send(
    &state,
    "POST",
    "/api/users/login",
    None,
    Some(json!({ "user": { "email": "jake@example.com", "password": "not-the-one" } })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_user_clears_and_keeps_fields() {
  let state = make_state().await;
  let token = register(&state, "jake").await;

  let (status, body) = send(
    &state,
    "PUT",
    "/api/user",
    Some(&token),
    Some(json!({ "user": { "bio": "hello", "image": "https://i.example/j.png" } })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"]["bio"], "hello");

  let (_, body) = send(
    &state,
    "PUT",
    "/api/user",
    Some(&token),
    Some(json!({ "user": { "image": null } })),
  )
  .await;
  assert_eq!(body["user"]["bio"], "hello");
  assert_eq!(body["user"]["image"], Value::Null);

  let (status, _) = send(
    &state,
    "PUT",
    "/api/user",
    Some(&token),
    Some(json!({ "user": { "email": null } })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn current_user_requires_a_token() {
  let state = make_state().await;
  let (status, _) = send(&state, "GET", "/api/user", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_on_optional_route_is_unauthorized() {
  let state = make_state().await;
  let (status, _) = send(&state, "GET", "/api/articles", Some("garbage"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Profiles ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn follow_twice_conflicts_and_unfollow_is_idempotent() {
  let state = make_state().await;
  let a = register(&state, "a").await;
  register(&state, "b").await;

  let (status, body) = send(&state, "POST", "/api/profiles/b/follow", Some(&a), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["profile"]["following"], true);

  let (status, _) = send(&state, "POST", "/api/profiles/b/follow", Some(&a), None).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, body) = send(&state, "GET", "/api/profiles/b", Some(&a), None).await;
  assert_eq!(body["profile"]["following"], true);
  let (_, body) = send(&state, "GET", "/api/profiles/b", None, None).await;
  assert_eq!(body["profile"]["following"], false);

  for _ in 0..2 {
    let (status, body) = send(&state, "DELETE", "/api/profiles/b/follow", Some(&a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["following"], false);
  }
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
  let state = make_state().await;
  let (status, body) = send(&state, "GET", "/api/profiles/ghost", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["errors"]["body"].is_array());
}

// ── Articles ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn article_lifecycle() {
  let state = make_state().await;
  let jake = register(&state, "jake").await;
  let slug = publish(&state, &jake, "How to train your dragon", &["b", "a", "a"]).await;
  assert!(slug.starts_with("how-to-train-your-dragon-"));

  let (status, body) = send(&state, "GET", &format!("/api/articles/{slug}"), None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["article"]["tagList"], json!(["a", "b"]));
  assert_eq!(body["article"]["favoritesCount"], 0);
  assert_eq!(body["article"]["author"]["username"], "jake");

  let (status, body) = send(
    &state,
    "PUT",
    &format!("/api/articles/{slug}"),
    Some(&jake),
    Some(json!({ "article": { "title": "Dragons revisited" } })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let new_slug = body["article"]["slug"].as_str().unwrap().to_string();
  assert!(new_slug.starts_with("dragons-revisited-"));

  let (status, _) = send(&state, "GET", &format!("/api/articles/{slug}"), None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_may_edit() {
  let state = make_state().await;
  let jake = register(&state, "jake").await;
  let ann = register(&state, "ann").await;
  let slug = publish(&state, &jake, "Mine", &[]).await;

  let (status, _) = send(
    &state,
    "PUT",
    &format!("/api/articles/{slug}"),
    Some(&ann),
    Some(json!({ "article": { "body": "hijacked" } })),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_article_requires_title() {
  let state = make_state().await;
  let jake = register(&state, "jake").await;
  let (status, _) = send(
    &state,
    "POST",
    "/api/articles",
    Some(&jake),
    Some(json!({ "article": { "description": "d", "body": "b" } })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_and_feed() {
  let state = make_state().await;
  let a = register(&state, "a").await;
  let b = register(&state, "b").await;
  let c = register(&state, "c").await;
  send(&state, "POST", "/api/profiles/b/follow", Some(&a), None).await;
  publish(&state, &b, "From b", &["rust"]).await;
  publish(&state, &c, "From c", &["go"]).await;

  let (status, body) = send(&state, "GET", "/api/articles/feed", Some(&a), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["articlesCount"], 1);
  assert_eq!(body["articles"][0]["author"]["following"], true);

  let (status, _) = send(&state, "GET", "/api/articles/feed", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (_, body) = send(&state, "GET", "/api/articles?limit=1", None, None).await;
  assert_eq!(body["articlesCount"], 2);
  assert_eq!(body["articles"].as_array().unwrap().len(), 1);
  assert_eq!(body["articles"][0]["title"], "From c");

  let (_, body) = send(&state, "GET", "/api/articles?tag=rust", None, None).await;
  assert_eq!(body["articlesCount"], 1);
  assert_eq!(body["articles"][0]["title"], "From b");

  let (_, body) = send(&state, "GET", "/api/articles?favorited=ghost", None, None).await;
  assert_eq!(body["articlesCount"], 0);

  let (_, body) = send(&state, "GET", "/api/tags", None, None).await;
  assert_eq!(body["tags"], json!(["go", "rust"]));
}

#[tokio::test]
async fn favorite_and_unfavorite() {
  let state = make_state().await;
  let a = register(&state, "a").await;
  let b = register(&state, "b").await;
  let slug = publish(&state, &b, "Favorite me", &[]).await;
  let uri = format!("/api/articles/{slug}/favorite");

  let (status, body) = send(&state, "POST", &uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["article"]["favorited"], true);
  assert_eq!(body["article"]["favoritesCount"], 1);

  let (status, _) = send(&state, "POST", &uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, body) = send(&state, "DELETE", &uri, Some(&a), None).await;
  assert_eq!(body["article"]["favorited"], false);
  assert_eq!(body["article"]["favoritesCount"], 0);

  let (status, _) = send(&state, "DELETE", &uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Comments ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comment_thread() {
  let state = make_state().await;
  let a = register(&state, "a").await;
  let b = register(&state, "b").await;
  let slug = publish(&state, &a, "Discuss", &[]).await;
  let uri = format!("/api/articles/{slug}/comments");

  let (status, body) = send(
    &state,
    "POST",
    &uri,
    Some(&b),
    Some(json!({ "comment": { "body": "first!" } })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = body["comment"]["id"].as_i64().unwrap();

  let (_, body) = send(&state, "GET", &uri, None, None).await;
  assert_eq!(body["comments"][0]["body"], "first!");
  assert_eq!(body["comments"][0]["author"]["username"], "b");

  let (status, _) = send(&state, "DELETE", &format!("{uri}/{id}"), Some(&a), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, _) = send(&state, "DELETE", &format!("{uri}/{id}"), Some(&b), None).await;
  assert_eq!(status, StatusCode::OK);

  let (_, body) = send(&state, "GET", &uri, None, None).await;
  assert_eq!(body["comments"], json!([]));
}

#[tokio::test]
async fn empty_comment_is_rejected() {
  let state = make_state().await;
  let a = register(&state, "a").await;
  let slug = publish(&state, &a, "Quiet", &[]).await;
  let (status, _) = send(
    &state,
    "POST",
    &format!("/api/articles/{slug}/comments"),
    Some(&a),
    Some(json!({ "comment": { "body": "" } })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
