//! User rows.

use chrono::{DateTime, Utc};
use folio_core::user::{NewUser, User, UserChanges, UserId};
use rusqlite::{OptionalExtension as _, Transaction, params};

use crate::{
  Result,
  encode::{RawUser, USER_COLUMNS, encode_dt},
  error::ConstraintExt as _,
};

pub(crate) fn insert(tx: &Transaction<'_>, input: &NewUser, now: DateTime<Utc>) -> Result<User> {
  let at = encode_dt(now);
  tx.execute(
    "INSERT INTO users (username, email, password_hash, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?4)",
    params![input.username, input.email, input.password_hash, at],
  )
  .conflict_as(|| "username or email is already taken".to_owned())?;

  require_by_id(tx, UserId(tx.last_insert_rowid()))
}

fn find(tx: &Transaction<'_>, column: &str, value: &dyn rusqlite::ToSql) -> Result<Option<User>> {
  let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
  let raw = tx
    .query_row(&sql, [value], RawUser::from_row)
    .optional()?;
  raw.map(RawUser::into_user).transpose()
}

pub(crate) fn by_id(tx: &Transaction<'_>, id: UserId) -> Result<Option<User>> {
  find(tx, "user_id", &id.0)
}

pub(crate) fn by_username(tx: &Transaction<'_>, username: &str) -> Result<Option<User>> {
  find(tx, "username", &username)
}

pub(crate) fn by_email(tx: &Transaction<'_>, email: &str) -> Result<Option<User>> {
  find(tx, "email", &email)
}

pub(crate) fn require_by_id(tx: &Transaction<'_>, id: UserId) -> Result<User> {
  by_id(tx, id)?.ok_or_else(|| folio_core::Error::not_found(format!("user {id}")).into())
}

pub(crate) fn require_by_username(tx: &Transaction<'_>, username: &str) -> Result<User> {
  by_username(tx, username)?
    .ok_or_else(|| folio_core::Error::not_found(format!("user `{username}`")).into())
}

/// Apply `changes` on top of the stored row. Absent fields keep their value.
pub(crate) fn update(
  tx:      &Transaction<'_>,
  id:      UserId,
  changes: UserChanges,
  now:     DateTime<Utc>,
) -> Result<User> {
  let current = require_by_id(tx, id)?;

  let username = changes.username.into_value().unwrap_or(current.username);
  let email = changes.email.into_value().unwrap_or(current.email);
  let password_hash = changes
    .password_hash
    .into_value()
    .unwrap_or(current.password_hash);
  let bio = changes.bio.apply(current.bio);
  let image = changes.image.apply(current.image);

  tx.execute(
    "UPDATE users
     SET username = ?1, email = ?2, password_hash = ?3, bio = ?4, image = ?5, updated_at = ?6
     WHERE user_id = ?7",
    params![username, email, password_hash, bio, image, encode_dt(now), id.0],
  )
  .conflict_as(|| "username or email is already taken".to_owned())?;

  require_by_id(tx, id)
}
